use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};

use super::SourceError;

/// Every upstream request shares this client and its 10 second timeout. A
/// slow source delays only its own thread, never the rest of the run.
fn client() -> &'static Client {
    static CLIENT: Lazy<Client> = Lazy::new(|| {
        Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("dancetime/0.1 (+https://github.com/dancetime/dancetime)")
            .build()
            .expect("http client")
    });
    &CLIENT
}

pub fn fetch_html(url: &str) -> Result<String, SourceError> {
    let response = client()
        .get(url)
        .send()
        .map_err(|err| SourceError::request(url, err))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(|err| SourceError::request(url, err))
}

/// Collapses all runs of whitespace to single spaces and trims.
pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| {
            let cleaned = inner_text(node);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .flatten()
}

pub fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// Flattens an HTML fragment (some APIs ship their descriptions as markup)
/// to plain display text.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    inner_text(fragment.root_element())
}

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("valid clock regex"));

/// First "HH:MM" in the text, if any.
pub fn find_clock_time(text: &str) -> Option<NaiveTime> {
    let caps = CLOCK_RE.captures(text)?;
    let hour = caps.get(1)?.as_str().parse().ok()?;
    let minute = caps.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

static GERMAN_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})\.\s*([A-Za-zÄÖÜäöü]+)\s+(\d{4})").expect("valid german date regex")
});

fn german_month(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "jänner" | "januar" => 1,
        "februar" => 2,
        "märz" => 3,
        "april" => 4,
        "mai" => 5,
        "juni" => 6,
        "juli" => 7,
        "august" => 8,
        "september" => 9,
        "oktober" => 10,
        "november" => 11,
        "dezember" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parses spelled-out German dates like "18.Dezember 2022 / 10:00", with the
/// time of day defaulting to midnight when the text carries none.
pub fn parse_german_datetime(text: &str) -> Option<NaiveDateTime> {
    let caps = GERMAN_DATE_RE.captures(text)?;
    let day = caps.get(1)?.as_str().parse().ok()?;
    let month = german_month(caps.get(2)?.as_str())?;
    let year = caps.get(3)?.as_str().parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = find_clock_time(&text[caps.get(0)?.end()..])
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).expect("midnight exists"));
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_decorative_whitespace() {
        assert_eq!(clean_text("  Perfektion \n\t mit  Karina "), "Perfektion mit Karina");
    }

    #[test]
    fn flattens_html_descriptions() {
        assert_eq!(
            html_to_text("<p>Tanzen &amp; mehr</p><p>am Sonntag</p>"),
            "Tanzen & mehr am Sonntag"
        );
    }

    #[test]
    fn finds_clock_times_in_noise() {
        assert_eq!(
            find_clock_time("Einlass ab 19:30 Uhr"),
            NaiveTime::from_hms_opt(19, 30, 0)
        );
        assert_eq!(find_clock_time("kein Termin"), None);
    }

    #[test]
    fn parses_spelled_out_german_dates() {
        let parsed = parse_german_datetime("18.Dezember 2022 / 10:00 ").expect("parse date");
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2022, 12, 18)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );

        let midnight = parse_german_datetime("1. Jänner 2024").expect("parse date");
        assert_eq!(
            midnight,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn rejects_unknown_months() {
        assert_eq!(parse_german_datetime("18.Smarch 2022"), None);
    }
}
