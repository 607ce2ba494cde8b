use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::base;
use super::{EventSource, SourceError};
use crate::models::DanceEvent;

const URL: &str = "https://www.tanzschule-immervoll.at/events/";
const SCHOOL: &str = "Immervoll";

const PERFEKTION_DESCRIPTION: &str = "Altgasse 6, 1130 Wien\n\
    Keine Voranmeldung notwendig. Teilnahme nur paarweise möglich.\n\
    Abendbeitrag pro Paar: EUR 15,00\n\n\
    Verschiedene Tanz- und Übungsabende runden unser Kursangebot ab!";

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("immervoll table selector"));
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("immervoll row selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("immervoll cell selector"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("immervoll img selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div").expect("immervoll title selector"));

// "Samstag, 21.01.2023 19:30 - 22:15 Uhr", common all over the page.
static DATES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r", ([0-9.]+) ([0-9:]+) - ([0-9:]+) Uhr").expect("immervoll date regex")
});

pub struct Immervoll;

impl EventSource for Immervoll {
    fn name(&self) -> &'static str {
        "immervoll"
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
    let tables: Vec<ElementRef<'_>> = document.select(&TABLE_SELECTOR).collect();

    // The page is one big table layout: the first table lists one-off events,
    // the third the weekly Perfektion evenings.
    let events_table = tables
        .first()
        .ok_or_else(|| SourceError::shape(URL, "events table missing"))?;
    let perfektion_table = tables
        .get(2)
        .ok_or_else(|| SourceError::shape(URL, "perfektion table missing"))?;

    let mut events = Vec::new();

    for row in events_table.select(&ROW_SELECTOR) {
        if !is_vienna_row(&row) {
            continue;
        }
        let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
        let info = match cells.get(1) {
            Some(cell) => base::inner_text(*cell),
            None => continue,
        };
        let (starts_at, ends_at) = match parse_datetimes(&info) {
            Some(span) => span,
            None => {
                warn!("immervoll: skipping row with unparseable dates {info:?}");
                continue;
            }
        };

        let title_text = match row.select(&TITLE_SELECTOR).next() {
            Some(node) => base::inner_text(node),
            None => continue,
        };
        let (name, description) = match title_text.split_once('|') {
            Some((name, rest)) => (
                title_case(name.trim()),
                rest.split('|').map(str::trim).collect::<Vec<_>>().join("\n"),
            ),
            None => (title_case(title_text.trim()), String::new()),
        };

        events.push(DanceEvent {
            starts_at,
            ends_at: Some(ends_at),
            name,
            description,
            price_euro_cent: None,
            dancing_school: SCHOOL.to_string(),
            website: URL.to_string(),
        });
    }

    for row in perfektion_table.select(&ROW_SELECTOR) {
        if !is_vienna_row(&row) {
            continue;
        }
        let text = base::inner_text(row);
        let (starts_at, ends_at) = match parse_datetimes(&text) {
            Some(span) => span,
            None => continue,
        };

        events.push(DanceEvent {
            starts_at,
            ends_at: Some(ends_at),
            name: "Perfektion".to_string(),
            description: PERFEKTION_DESCRIPTION.to_string(),
            // The page only quotes a per-pair price, so per person is unknown.
            price_euro_cent: None,
            dancing_school: SCHOOL.to_string(),
            website: URL.to_string(),
        });
    }

    if events.is_empty() {
        return Err(SourceError::shape(URL, "no rows parsed from either table"));
    }
    Ok(events)
}

/// Rows are tagged with a location icon; `standort_ac` marks the Auhof
/// branch, which is technically Vienna but not worth the trip, so it is not
/// listed.
fn is_vienna_row(row: &ElementRef<'_>) -> bool {
    match base::first_attr(row, &IMG_SELECTOR, "src") {
        Some(src) => !src.contains("standort_ac"),
        None => false,
    }
}

fn parse_datetimes(text: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let caps = DATES_RE.captures(text)?;
    let day = NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%d.%m.%Y").ok()?;
    let starts = base::find_clock_time(caps.get(2)?.as_str())?;
    let ends = base::find_clock_time(caps.get(3)?.as_str())?;

    let starts_at = day.and_time(starts);
    let mut ends_at = day.and_time(ends);
    if ends_at < starts_at {
        ends_at += Duration::days(1);
    }
    Some((starts_at, ends_at))
}

fn title_case(name: &str) -> String {
    name.replace('-', " ")
        .split(' ')
        .filter(|word| !word.is_empty())
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

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
    <table>
        <tr>
            <td><img src="/img/standort_hi.png"></td>
            <td>Samstag, 21.01.2023 19:30 - 22:15 Uhr
                <div>SILVESTER-GALA | Festlicher Abend | Anmeldung erforderlich</div>
            </td>
        </tr>
        <tr>
            <td><img src="/img/standort_ac.png"></td>
            <td>Samstag, 28.01.2023 19:30 - 22:15 Uhr
                <div>Auhof Abend | wird nicht gelistet</div>
            </td>
        </tr>
    </table>
    <table><tr><td>Kursplan</td></tr></table>
    <table>
        <tr>
            <td><img src="/img/standort_hi.png"></td>
            <td>Freitag, 27.01.2023 21:00 - 23:00 Uhr</td>
        </tr>
        <tr>
            <td><img src="/img/standort_hi.png"></td>
            <td>Samstag, 28.01.2023 23:00 - 01:00 Uhr</td>
        </tr>
    </table>
    "#;

    #[test]
    fn parses_vienna_rows_from_both_tables() {
        let events = parse_document(SAMPLE_HTML).expect("parse immervoll html");
        assert_eq!(events.len(), 3);

        let gala = &events[0];
        assert_eq!(gala.name, "Silvester Gala");
        assert_eq!(gala.description, "Festlicher Abend\nAnmeldung erforderlich");
        assert_eq!(
            gala.starts_at,
            NaiveDate::from_ymd_opt(2023, 1, 21)
                .unwrap()
                .and_hms_opt(19, 30, 0)
                .unwrap()
        );

        assert!(events.iter().all(|event| !event.name.contains("Auhof")));
        assert_eq!(events[1].name, "Perfektion");
        assert!(events[1].price_euro_cent.is_none());
    }

    #[test]
    fn rolls_overnight_ends_to_the_next_day() {
        let events = parse_document(SAMPLE_HTML).expect("parse immervoll html");
        let late = &events[2];
        assert_eq!(
            late.ends_at,
            Some(
                NaiveDate::from_ymd_opt(2023, 1, 29)
                    .unwrap()
                    .and_hms_opt(1, 0, 0)
                    .unwrap()
            )
        );
        assert!(late.ends_at.unwrap() > late.starts_at);
    }

    #[test]
    fn missing_tables_are_a_shape_error() {
        assert!(matches!(
            parse_document("<table></table>"),
            Err(SourceError::Shape { .. })
        ));
    }
}
