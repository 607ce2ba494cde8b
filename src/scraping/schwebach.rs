use chrono::TimeZone;
use chrono_tz::Europe::Vienna;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::base;
use super::{EventSource, SourceError};
use crate::models::DanceEvent;

// Undocumented, found by watching the website's own requests; beats parsing
// their HTML.
const API_URL: &str =
    "https://schwebach.at/wp-content/plugins/sieglsolutions_masterPlugin/getData/getEvents.php";
const EVENT_BASE_URL: &str = "https://schwebach.at/events/";
const SCHOOL: &str = "Schwebach";

#[derive(Deserialize)]
struct Payload {
    cdata: CData,
}

#[derive(Deserialize)]
struct CData {
    events: Vec<RawEvent>,
}

#[derive(Deserialize)]
struct RawEvent {
    location_bez: String,
    nc_name: String,
    /// HTML, not plain text.
    nc_description: String,
    /// Unix timestamp, sometimes a number and sometimes a string.
    nc_begin: Value,
    webroute: String,
}

pub struct Schwebach;

impl EventSource for Schwebach {
    fn name(&self) -> &'static str {
        "schwebach"
    }

    fn website(&self) -> &'static str {
        "https://schwebach.at/events/"
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let body = base::fetch_html(API_URL)?;
        parse_payload(&body)
    }
}

pub(crate) fn parse_payload(body: &str) -> Result<Vec<DanceEvent>, SourceError> {
    let payload: Payload =
        serde_json::from_str(body).map_err(|err| SourceError::shape(API_URL, err.to_string()))?;

    let mut events = Vec::new();
    for raw in payload.cdata.events {
        // Schwebach also runs houses outside Vienna.
        if raw.location_bez != "Wien" {
            continue;
        }

        let starts_at = match unix_timestamp(&raw.nc_begin)
            .and_then(|ts| Vienna.timestamp_opt(ts, 0).single())
        {
            Some(dt) => dt.naive_local(),
            None => {
                warn!(
                    "schwebach: skipping {:?} with invalid timestamp {:?}",
                    raw.nc_name, raw.nc_begin
                );
                continue;
            }
        };

        events.push(DanceEvent {
            starts_at,
            ends_at: None,
            name: raw.nc_name,
            description: base::html_to_text(&raw.nc_description),
            price_euro_cent: None,
            dancing_school: SCHOOL.to_string(),
            website: format!("{EVENT_BASE_URL}{}", raw.webroute),
        });
    }

    Ok(events)
}

fn unix_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}
