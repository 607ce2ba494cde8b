use chrono::NaiveDateTime;
use log::warn;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::base;
use super::{EventSource, SourceError};
use crate::models::DanceEvent;

const URL: &str = "https://www.ballsaal.at/termine_tickets/?no_cache=1";
const SCHOOL: &str = "Ballsaal";

static EVENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".event").expect("ballsaal event selector"));
static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".name").expect("ballsaal name selector"));
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".short-description").expect("ballsaal description selector"));
static DATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".date").expect("ballsaal date selector"));
static BUTTON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.button").expect("ballsaal button selector"));

pub struct Ballsaal;

impl EventSource for Ballsaal {
    fn name(&self) -> &'static str {
        "ballsaal"
    }

    fn website(&self) -> &'static str {
        URL
    }

    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let html = base::fetch_html(URL)?;
        parse_document(&html)
    }
}

pub(crate) fn parse_document(html: &str) -> Result<Vec<DanceEvent>, SourceError> {
    let document = Html::parse_document(html);

    let mut events = Vec::new();
    for item in document.select(&EVENT_SELECTOR) {
        let name = match base::first_text(&item, &NAME_SELECTOR) {
            Some(text) => text,
            None => continue,
        };
        let description = base::first_text(&item, &DESCRIPTION_SELECTOR).unwrap_or_default();
        let date_text = match base::first_text(&item, &DATE_SELECTOR) {
            Some(text) => text,
            None => continue,
        };
        let website = base::first_attr(&item, &BUTTON_SELECTOR, "href")
            .unwrap_or_else(|| URL.to_string());

        // "Sa, 31.12.2024, 20:00 Uhr" with a localized weekday prefix.
        let starts_at = match parse_date(&date_text) {
            Some(starts_at) => starts_at,
            None => {
                warn!("ballsaal: skipping event with unparseable date {date_text:?}");
                continue;
            }
        };

        events.push(DanceEvent {
            starts_at,
            ends_at: None,
            name: polish_name(&name),
            description,
            price_euro_cent: None,
            dancing_school: SCHOOL.to_string(),
            website,
        });
    }

    if events.is_empty() {
        return Err(SourceError::shape(URL, "no event cards found"));
    }
    Ok(events)
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let digits_onward = text.trim_start_matches(|c: char| !c.is_ascii_digit());
    NaiveDateTime::parse_from_str(digits_onward, "%d.%m.%Y, %H:%M Uhr").ok()
}

/// Some titles arrive wrapped in decorative quotes, some in all-caps for no
/// reason. Deterministic cleanup only, nothing heuristic.
fn polish_name(raw: &str) -> String {
    let name = raw
        .trim_matches(|c: char| matches!(c, '"' | '\u{201e}' | '\u{201c}' | '\u{201d}' | '\''))
        .trim();

    let all_caps = !name.chars().any(|c| c.is_lowercase());
    if all_caps && name.chars().any(|c| c.is_alphabetic()) {
        title_case(name)
    } else {
        name.to_string()
    }
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
