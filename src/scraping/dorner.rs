use chrono::Weekday;

use super::{EventSource, SourceError};
use crate::models::DanceEvent;
use crate::recurrence::{template_time, Recurrence, WeeklySchedule};

const WEBSITE: &str = "https://tanzdorner.at/#perfektion";
const SCHOOL: &str = "Dorner";

/// Hardcoded Friday TanzZeit, read off the (unparsable) website.
pub struct Dorner {
    recurrence: Recurrence,
}

impl Dorner {
    pub fn new(recurrence: Recurrence) -> Self {
        Self { recurrence }
    }
}

impl EventSource for Dorner {
    fn name(&self) -> &'static str {
        "dorner"
    }

    fn website(&self) -> &'static str {
        WEBSITE
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let template = DanceEvent {
            starts_at: template_time(20, 15),
            ends_at: Some(template_time(22, 15)),
            name: "Perfektion".to_string(),
            description: "Favoritenstraße 20, 1040 Wien\nFreitagsperfektion TanzZeit\n\
                Im Dorner Club inkludiert I Dorner Schüler:innen € 5,-- I Gäste € 7,-"
                .to_string(),
            price_euro_cent: Some(700),
            dancing_school: SCHOOL.to_string(),
            website: WEBSITE.to_string(),
        };

        Ok(self
            .recurrence
            .weekly(&WeeklySchedule::on(Weekday::Fri), &template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::holiday::HolidayCalendar;
    use crate::recurrence::DEFAULT_WEEKS;
    use chrono::{Datelike, NaiveDate};
    use std::sync::Arc;

    #[test]
    fn produces_friday_perfektionen() {
        let clock = FixedClock(
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );
        let recurrence = Recurrence::new(
            Arc::new(clock),
            Arc::new(HolidayCalendar::from_dates([])),
        );

        let events = Dorner::new(recurrence).produce().expect("dorner events");
        assert_eq!(events.len(), DEFAULT_WEEKS);
        assert!(events
            .iter()
            .all(|event| event.starts_at.weekday() == Weekday::Fri));
        assert!(events.iter().all(|event| event.price_euro_cent == Some(700)));
    }
}
