use chrono::{NaiveDate, Weekday};

use super::{EventSource, SourceError};
use crate::models::DanceEvent;
use crate::recurrence::{remove_events_between, template_time, Recurrence, WeeklySchedule};

const WEBSITE: &str = "https://www.tanzschule-strobl.at/perfektion.html";
const SCHOOL: &str = "Strobl";
const DESCRIPTION: &str = "€ 5.50 pro Person - keine Anmeldung erforderlich.";

/// Hardcoded Sunday and Wednesday Perfektionen, read off the (unparsable)
/// website, with the published semester break carved out.
pub struct Strobl {
    recurrence: Recurrence,
}

impl Strobl {
    pub fn new(recurrence: Recurrence) -> Self {
        Self { recurrence }
    }
}

impl EventSource for Strobl {
    fn name(&self) -> &'static str {
        "strobl"
    }

    fn website(&self) -> &'static str {
        WEBSITE
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let template = |starts, ends, name: &str| DanceEvent {
            starts_at: starts,
            ends_at: Some(ends),
            name: name.to_string(),
            description: DESCRIPTION.to_string(),
            price_euro_cent: Some(550),
            dancing_school: SCHOOL.to_string(),
            website: WEBSITE.to_string(),
        };

        let mut events = self.recurrence.weekly(
            &WeeklySchedule::on(Weekday::Sun),
            &template(template_time(19, 0), template_time(21, 30), "Perfektion"),
        );
        events.extend(self.recurrence.weekly(
            &WeeklySchedule::on(Weekday::Wed),
            &template(
                template_time(20, 0),
                template_time(22, 0),
                "Perfektion mit Karina",
            ),
        ));

        // No events in the semester holidays.
        let events = remove_events_between(
            NaiveDate::from_ymd_opt(2024, 2, 4)
                .expect("valid date")
                .and_hms_opt(0, 0, 0)
                .expect("valid time"),
            NaiveDate::from_ymd_opt(2024, 2, 11)
                .expect("valid date")
                .and_hms_opt(23, 59, 0)
                .expect("valid time"),
            events,
        );

        Ok(events)
    }
}
