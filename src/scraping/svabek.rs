use chrono::Weekday;

use super::{EventSource, SourceError};
use crate::models::DanceEvent;
use crate::recurrence::{template_time, Recurrence, WeeklySchedule};

const WEBSITE: &str = "https://tanzschulewien.at/Perfektionen/";
const SCHOOL: &str = "Svabek";

/// The Perfektion page is not parsable, so the published schedule is
/// hardcoded: Thursday and Friday evenings, closed on public holidays.
/// If the website changes we have to change this code, and worse, we
/// probably won't notice the change.
pub struct Svabek {
    recurrence: Recurrence,
}

impl Svabek {
    pub fn new(recurrence: Recurrence) -> Self {
        Self { recurrence }
    }
}

impl EventSource for Svabek {
    fn name(&self) -> &'static str {
        "svabek"
    }

    fn website(&self) -> &'static str {
        WEBSITE
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let template = DanceEvent {
            starts_at: template_time(20, 0),
            ends_at: Some(template_time(23, 30)),
            name: "Perfektion".to_string(),
            description: "Abendbeitrag € 5,- / Pers.\nOffener Tanzabend für alle! \
                Kursteilnahme nicht notwendig."
                .to_string(),
            price_euro_cent: Some(500),
            dancing_school: SCHOOL.to_string(),
            website: WEBSITE.to_string(),
        };

        let mut events = Vec::new();
        for weekday in [Weekday::Thu, Weekday::Fri] {
            let schedule = WeeklySchedule {
                exclude_holidays: true,
                ..WeeklySchedule::on(weekday)
            };
            events.extend(self.recurrence.weekly(&schedule, &template));
        }
        Ok(events)
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

    fn recurrence(holidays: HolidayCalendar) -> Recurrence {
        // A Monday.
        let clock = FixedClock(
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );
        Recurrence::new(Arc::new(clock), Arc::new(holidays))
    }

    #[test]
    fn produces_thursday_and_friday_perfektionen() {
        let source = Svabek::new(recurrence(HolidayCalendar::from_dates([])));
        let events = source.produce().expect("svabek events");

        assert_eq!(events.len(), 2 * DEFAULT_WEEKS);
        assert!(events.iter().all(|event| {
            let weekday = event.starts_at.weekday();
            weekday == Weekday::Thu || weekday == Weekday::Fri
        }));
        assert!(events.iter().all(|event| event.name == "Perfektion"));
        assert!(events.iter().all(|event| event.price_euro_cent == Some(500)));
    }

    #[test]
    fn closed_on_public_holidays() {
        // 2024-05-09 is a Thursday (Christi Himmelfahrt).
        let holiday = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let source = Svabek::new(recurrence(HolidayCalendar::from_dates([holiday])));
        let events = source.produce().expect("svabek events");

        assert_eq!(events.len(), 2 * DEFAULT_WEEKS - 1);
        assert!(events.iter().all(|event| event.starts_at.date() != holiday));
    }
}
