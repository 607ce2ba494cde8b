use log::warn;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::base;
use super::{EventSource, SourceError};
use crate::models::DanceEvent;

const URL: &str = "https://www.tanzschulerueff.at/fruehstueck.htm";
const SCHOOL: &str = "Rueff";

static OPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("select[name=\"Auswahl\"] option").expect("rueff option selector")
});

pub struct Rueff;

impl EventSource for Rueff {
    fn name(&self) -> &'static str {
        "rueff"
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

    let mut saw_options = false;
    let mut events = Vec::new();
    for option in document.select(&OPTION_SELECTOR) {
        saw_options = true;
        let text = base::inner_text(option);

        // The first option is the "Termin auswählen" placeholder.
        if text.to_lowercase().contains("termin") {
            continue;
        }

        // "18.Dezember 2022 / 10:00 - 1300 Uhr"; everything after the dash is
        // a sloppily formatted end time, the date and start sit before it.
        let date_part = text.split('-').next().unwrap_or(&text);
        let starts_at = match base::parse_german_datetime(date_part) {
            Some(starts_at) => starts_at,
            None => {
                warn!("rueff: skipping option with unparseable date {text:?}");
                continue;
            }
        };

        events.push(DanceEvent {
            starts_at,
            ends_at: None,
            name: "Tanzfrühstück".to_string(),
            description: "Tanzen und frühstücken am Sonntag in der Tanzschule Rueff!".to_string(),
            price_euro_cent: None,
            dancing_school: SCHOOL.to_string(),
            website: URL.to_string(),
        });
    }

    if !saw_options {
        return Err(SourceError::shape(URL, "date dropdown not found"));
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE_HTML: &str = r#"
    <form>
        <select name="Auswahl">
            <option>Termin auswählen</option>
            <option>18.Dezember 2022 / 10:00 - 1300 Uhr</option>
            <option>15.Jänner 2023 / 10:00 - 1300 Uhr</option>
        </select>
    </form>
    "#;

    #[test]
    fn parses_breakfast_dates_from_the_dropdown() {
        let events = parse_document(SAMPLE_HTML).expect("parse rueff html");
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].name, "Tanzfrühstück");
        assert_eq!(
            events[0].starts_at,
            NaiveDate::from_ymd_opt(2022, 12, 18)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(
            events[1].starts_at,
            NaiveDate::from_ymd_opt(2023, 1, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn missing_dropdown_is_a_shape_error() {
        assert!(matches!(
            parse_document("<html><body></body></html>"),
            Err(SourceError::Shape { .. })
        ));
    }
}
