use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use log::warn;
use serde::Deserialize;

use super::base;
use super::{EventSource, SourceError};
use crate::clock::Clock;
use crate::models::DanceEvent;

const API_URL: &str =
    "https://tanzschulestanek.at/wp-content/plugins/ts_kurse/api/ts_kalender.php";
const SCHOOL: &str = "Stanek";

const DESCRIPTION: &str = "In der Dance Night könnt Ihr in der Tanzschule Stanek \
    ausgiebig tanzen, Eure Tanzkenntnisse vertiefen und einen netten Abend verbringen";

/// Everything else in the feed is a closed course, not open to the public.
const ALLOWED_URLS: [&str; 2] = [
    "https://tanzschulestanek.at/tanzkurse/dance-times-perfektion/",
    "https://tanzschulestanek.at/veranstaltungen/",
];

#[derive(Deserialize)]
struct RawEntry {
    start: String,
    title: String,
    url: String,
}

/// The website itself is too janky to parse, but its embedded calendar
/// widget pulls JSON from this endpoint, so we pretend to be the calendar.
pub struct Stanek {
    clock: Arc<dyn Clock>,
}

impl Stanek {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl EventSource for Stanek {
    fn name(&self) -> &'static str {
        "stanek"
    }

    fn website(&self) -> &'static str {
        "https://tanzschulestanek.at/veranstaltungen/"
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let start = self.clock.today();
        let end = start + Duration::weeks(9);
        let url = format!("{API_URL}?start={start}&end={end}");

        let body = base::fetch_html(&url)?;
        parse_payload(&body, &url)
    }
}

pub(crate) fn parse_payload(body: &str, url: &str) -> Result<Vec<DanceEvent>, SourceError> {
    let entries: Vec<RawEntry> =
        serde_json::from_str(body).map_err(|err| SourceError::shape(url, err.to_string()))?;

    let mut events = Vec::new();
    for entry in entries {
        if !ALLOWED_URLS.contains(&entry.url.as_str()) {
            continue;
        }

        let starts_at = match parse_iso(&entry.start) {
            Some(starts_at) => starts_at,
            None => {
                warn!(
                    "stanek: skipping {:?} with unparseable start {:?}",
                    entry.title, entry.start
                );
                continue;
            }
        };

        // Dance Nights always wrap up at 22:30; the feed does not say so.
        let ends_at = entry.title.to_lowercase().contains("dance night").then(|| {
            starts_at
                .date()
                .and_time(NaiveTime::from_hms_opt(22, 30, 0).expect("valid time"))
        });

        events.push(DanceEvent {
            starts_at,
            ends_at,
            name: entry.title,
            description: DESCRIPTION.to_string(),
            price_euro_cent: None,
            dancing_school: SCHOOL.to_string(),
            website: entry.url,
        });
    }

    Ok(events)
}

fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    None
}
