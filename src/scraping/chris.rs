use std::thread;

use chrono::{Duration, NaiveDate};
use log::warn;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::base;
use super::{EventSource, SourceError};
use crate::models::DanceEvent;
use crate::postprocess;

const BASE_URL: &str = "https://www.tanzschulechris.at";
const OVERVIEW_URL: &str = "https://www.tanzschulechris.at/perfektionen/tanzcafe_wien_1";
const SCHOOL: &str = "Chris";

static ITEM_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".news-list-item a").expect("chris item link selector"));
static DATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".news-list-date").expect("chris date selector"));
static START_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".event-starttime").expect("chris start selector"));
static END_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".event-endtime").expect("chris end selector"));
static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".header > h2").expect("chris name selector"));
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".news-text-wrap").expect("chris description selector"));

pub struct Chris;

impl EventSource for Chris {
    fn name(&self) -> &'static str {
        "chris"
    }

    fn website(&self) -> &'static str {
        OVERVIEW_URL
    }

    /// The overview page only carries links; every event's times and booking
    /// state live on its own detail page, so a second wave of concurrent
    /// requests fetches those. One broken detail page costs that one event.
    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let overview = base::fetch_html(OVERVIEW_URL)?;
        let links = parse_overview(&overview)?;

        let mut events = Vec::new();
        thread::scope(|scope| {
            let handles: Vec<_> = links
                .iter()
                .map(|link| scope.spawn(move || fetch_detail(link)))
                .collect();
            for handle in handles {
                match handle.join().expect("detail fetch thread panicked") {
                    Ok(event) => events.push(event),
                    Err(err) => warn!("chris: skipping event: {err}"),
                }
            }
        });

        // The Tanzcafe afternoons are listed as back-to-back sessions.
        Ok(postprocess::merge_adjacent(events))
    }
}

fn fetch_detail(url: &str) -> Result<DanceEvent, SourceError> {
    let html = base::fetch_html(url)?;
    parse_detail(&html, url)
}

pub(crate) fn parse_overview(html: &str) -> Result<Vec<String>, SourceError> {
    let document = Html::parse_document(html);
    let links: Vec<String> = document
        .select(&ITEM_LINK_SELECTOR)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| format!("{BASE_URL}{href}"))
        .collect();

    if links.is_empty() {
        return Err(SourceError::shape(OVERVIEW_URL, "no event links found"));
    }
    Ok(links)
}

pub(crate) fn parse_detail(html: &str, url: &str) -> Result<DanceEvent, SourceError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let date_text = base::first_text(&root, &DATE_SELECTOR)
        .ok_or_else(|| SourceError::shape(url, "event date missing"))?;
    let day = NaiveDate::parse_from_str(&date_text, "%d.%m.%Y")
        .map_err(|_| SourceError::shape(url, format!("unparseable date {date_text:?}")))?;

    let start = base::first_text(&root, &START_SELECTOR)
        .as_deref()
        .and_then(base::find_clock_time)
        .ok_or_else(|| SourceError::shape(url, "start time missing"))?;
    let end = base::first_text(&root, &END_SELECTOR)
        .as_deref()
        .and_then(base::find_clock_time)
        .ok_or_else(|| SourceError::shape(url, "end time missing"))?;

    let starts_at = day.and_time(start);
    let mut ends_at = day.and_time(end);
    if ends_at < starts_at {
        ends_at += Duration::days(1);
    }

    let mut name = base::first_text(&root, &NAME_SELECTOR)
        .ok_or_else(|| SourceError::shape(url, "event name missing"))?;
    if base::inner_text(root).to_lowercase().contains("ausgebucht") {
        name.push_str(" [ausgebucht]");
    }

    let description = base::first_text(&root, &DESCRIPTION_SELECTOR).unwrap_or_default();

    Ok(DanceEvent {
        starts_at,
        ends_at: Some(ends_at),
        name,
        description,
        price_euro_cent: None,
        dancing_school: SCHOOL.to_string(),
        website: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OVERVIEW: &str = r#"
    <div class="news-list-item">
        <a href="/perfektionen/tanzcafe/1234">Tanzcafe am Sonntag</a>
    </div>
    <div class="news-list-item">
        <a href="/perfektionen/tanzcafe/1235">Tanzcafe am Montag</a>
    </div>
    "#;

    const SAMPLE_DETAIL: &str = r#"
    <div class="header"><h2>Tanzcafe</h2></div>
    <span class="news-list-date"> 22.01.2023 </span>
    <span class="event-starttime">15:00</span>
    <span class="event-endtime">- 18:00 Uhr</span>
    <div class="news-text-wrap">Gemütliches Tanzen am Nachmittag.</div>
    "#;

    const SAMPLE_DETAIL_OVERNIGHT: &str = r#"
    <div class="header"><h2>Silvester Tanzcafe</h2></div>
    <span class="news-list-date">31.12.2022</span>
    <span class="event-starttime">23:00</span>
    <span class="event-endtime">- 01:00 Uhr</span>
    <div class="news-text-wrap">Bis ins neue Jahr! Leider schon ausgebucht.</div>
    "#;

    #[test]
    fn collects_absolute_detail_links() {
        let links = parse_overview(SAMPLE_OVERVIEW).expect("parse overview");
        assert_eq!(
            links,
            vec![
                "https://www.tanzschulechris.at/perfektionen/tanzcafe/1234".to_string(),
                "https://www.tanzschulechris.at/perfektionen/tanzcafe/1235".to_string(),
            ]
        );
    }

    #[test]
    fn empty_overview_is_a_shape_error() {
        assert!(matches!(
            parse_overview("<html></html>"),
            Err(SourceError::Shape { .. })
        ));
    }

    #[test]
    fn parses_a_detail_page() {
        let event =
            parse_detail(SAMPLE_DETAIL, "https://www.tanzschulechris.at/x").expect("parse detail");
        assert_eq!(event.name, "Tanzcafe");
        assert_eq!(
            event.starts_at,
            NaiveDate::from_ymd_opt(2023, 1, 22)
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap()
        );
        assert_eq!(
            event.ends_at,
            Some(
                NaiveDate::from_ymd_opt(2023, 1, 22)
                    .unwrap()
                    .and_hms_opt(18, 0, 0)
                    .unwrap()
            )
        );
        assert_eq!(event.description, "Gemütliches Tanzen am Nachmittag.");
        assert_eq!(event.dancing_school, "Chris");
    }

    #[test]
    fn overnight_events_end_the_next_day_and_carry_the_booked_badge() {
        let event = parse_detail(SAMPLE_DETAIL_OVERNIGHT, "https://www.tanzschulechris.at/y")
            .expect("parse detail");
        assert_eq!(event.name, "Silvester Tanzcafe [ausgebucht]");
        assert_eq!(
            event.ends_at,
            Some(
                NaiveDate::from_ymd_opt(2023, 1, 1)
                    .unwrap()
                    .and_hms_opt(1, 0, 0)
                    .unwrap()
            )
        );
        assert!(event.ends_at.unwrap() > event.starts_at);
    }

    #[test]
    fn missing_times_are_a_shape_error() {
        let broken = r#"
        <div class="header"><h2>Tanzcafe</h2></div>
        <span class="news-list-date">22.01.2023</span>
        "#;
        assert!(matches!(
            parse_detail(broken, "https://www.tanzschulechris.at/z"),
            Err(SourceError::Shape { .. })
        ));
    }
}
