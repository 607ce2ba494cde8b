use chrono::Weekday;

use super::{EventSource, SourceError};
use crate::models::DanceEvent;
use crate::recurrence::{template_time, Recurrence, WeeklySchedule};

const SCHOOL: &str = "Dimitar Stefanin";

/// Two alternating Thursday practice evenings: Latin on the first and third
/// Thursday of the month, ballroom on the second and fourth.
pub struct DimitarStefanin {
    recurrence: Recurrence,
}

impl DimitarStefanin {
    pub fn new(recurrence: Recurrence) -> Self {
        Self { recurrence }
    }
}

impl EventSource for DimitarStefanin {
    fn name(&self) -> &'static str {
        "dimitarstefanin"
    }

    fn website(&self) -> &'static str {
        "https://dimitarstefanin.com/"
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let template = |name: &str, focus: &str, website: &str| DanceEvent {
            starts_at: template_time(19, 0),
            ends_at: Some(template_time(20, 0)),
            name: name.to_string(),
            description: format!(
                "Fleischmarkt 3-5, 1010 Wien\nTanzvergnügen pur mit Dimitar Stefanin \
                 und Alexandra Scheriau. Intensive einstündige Übungseinheiten mit \
                 Fokus auf {focus}. Persönliche Betreuung und individuelles Feedback \
                 in 10-minütigen Einheiten."
            ),
            price_euro_cent: Some(1000),
            dancing_school: SCHOOL.to_string(),
            website: website.to_string(),
        };

        let mut events = self.recurrence.weekly(
            &WeeklySchedule {
                weeks_of_month: Some(vec![1, 3]),
                ..WeeklySchedule::on(Weekday::Thu)
            },
            &template(
                "Passion Latina",
                "Latin",
                "https://dimitarstefanin.com/passion-latina/",
            ),
        );
        events.extend(self.recurrence.weekly(
            &WeeklySchedule {
                weeks_of_month: Some(vec![2, 4]),
                ..WeeklySchedule::on(Weekday::Thu)
            },
            &template(
                "Ballroom Excellence",
                "Standardtanz",
                "https://dimitarstefanin.com/ballroom-excellence/",
            ),
        ));
        Ok(events)
    }
}
