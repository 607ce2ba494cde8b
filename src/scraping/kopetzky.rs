use chrono::Weekday;

use super::{EventSource, SourceError};
use crate::models::DanceEvent;
use crate::recurrence::{template_time, Recurrence, WeeklySchedule};

const WEBSITE: &str = "https://kopetzky.at/Perfektion";
const SCHOOL: &str = "Kopetzky";

/// Hardcoded weekend Perfektionen, read off the (unparsable) website.
pub struct Kopetzky {
    recurrence: Recurrence,
}

impl Kopetzky {
    pub fn new(recurrence: Recurrence) -> Self {
        Self { recurrence }
    }
}

impl EventSource for Kopetzky {
    fn name(&self) -> &'static str {
        "kopetzky"
    }

    fn website(&self) -> &'static str {
        WEBSITE
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let template = DanceEvent {
            starts_at: template_time(19, 30),
            ends_at: Some(template_time(21, 30)),
            name: "Perfektion".to_string(),
            description: "€5,- pro Person\nOffener Tanzabend für alle! \
                Kursteilnahme nicht notwendig."
                .to_string(),
            price_euro_cent: Some(500),
            dancing_school: SCHOOL.to_string(),
            website: WEBSITE.to_string(),
        };

        let mut events = Vec::new();
        for weekday in [Weekday::Sat, Weekday::Sun] {
            let schedule = WeeklySchedule {
                exclude_holidays: true,
                ..WeeklySchedule::on(weekday)
            };
            events.extend(self.recurrence.weekly(&schedule, &template));
        }
        Ok(events)
    }
}
