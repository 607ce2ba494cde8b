use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use chrono::{Duration, NaiveDate};
use log::warn;
use serde::Deserialize;

use super::base;
use super::{EventSource, SourceError};
use crate::models::DanceEvent;

const SCHOOL: &str = "Dance4Fun";
const WEBSITE: &str = "https://danceforfun.at/termine/";

/// One API page per course day; far more than nine weeks of Perfektionen.
const MAX_PAGES: usize = 100;
const WORKERS: usize = 10;

#[derive(Deserialize)]
struct Page {
    /// The day all courses on this page happen on.
    tag: Option<String>,
    data: Option<Vec<RawCourse>>,
}

#[derive(Deserialize)]
struct RawCourse {
    kurstypname: Option<String>,
    kursname: Option<String>,
    von: Option<String>,
    bis: Option<String>,
    inhalte: Option<String>,
}

pub struct Dance4Fun;

impl EventSource for Dance4Fun {
    fn name(&self) -> &'static str {
        "dance4fun"
    }

    fn website(&self) -> &'static str {
        WEBSITE
    }

    /// The API paginates by day, so the pages are fetched by a small worker
    /// pool pulling page numbers off a shared counter. A failing page loses
    /// that day, not the source.
    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
        let next_page = AtomicUsize::new(0);
        let (sender, receiver) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..WORKERS.max(1) {
                let sender = sender.clone();
                let next_page = &next_page;
                scope.spawn(move || loop {
                    let page = next_page.fetch_add(1, Ordering::Relaxed);
                    if page >= MAX_PAGES {
                        break;
                    }
                    match fetch_page(page) {
                        Ok(events) => {
                            let _ = sender.send(events);
                        }
                        Err(err) => warn!("dance4fun: skipping page {page}: {err}"),
                    }
                });
            }
            drop(sender);
        });

        Ok(receiver.into_iter().flatten().collect())
    }
}

fn fetch_page(page: usize) -> Result<Vec<DanceEvent>, SourceError> {
    let url = format!("https://retro.danceforfun.at/termine.php?page={page}");
    let body = base::fetch_html(&url)?;
    parse_page(&body, &url)
}

pub(crate) fn parse_page(body: &str, url: &str) -> Result<Vec<DanceEvent>, SourceError> {
    let page: Page =
        serde_json::from_str(body).map_err(|err| SourceError::shape(url, err.to_string()))?;

    let (day, courses) = match (page.tag, page.data) {
        (Some(tag), Some(courses)) if !courses.is_empty() => (tag, courses),
        _ => return Ok(Vec::new()),
    };
    let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
        .map_err(|_| SourceError::shape(url, format!("unparseable day {day:?}")))?;

    let mut events = Vec::new();
    for course in courses {
        // Only the open practice evenings, not the closed courses.
        if course.kurstypname.as_deref() != Some("Perfektion") {
            continue;
        }

        let span = course
            .von
            .as_deref()
            .and_then(base::find_clock_time)
            .zip(course.bis.as_deref().and_then(base::find_clock_time));
        let (von, bis) = match span {
            Some(span) => span,
            None => {
                warn!("dance4fun: skipping course without times on {day}");
                continue;
            }
        };

        let starts_at = day.and_time(von);
        let mut ends_at = day.and_time(bis);
        if ends_at < starts_at {
            ends_at += Duration::days(1);
        }

        events.push(DanceEvent {
            starts_at,
            ends_at: Some(ends_at),
            name: course.kursname.unwrap_or_else(|| "Perfektion".to_string()),
            description: course.inhalte.unwrap_or_default(),
            // Not in the API; the flat door price from the website.
            price_euro_cent: Some(350),
            dancing_school: SCHOOL.to_string(),
            website: WEBSITE.to_string(),
        });
    }

    Ok(events)
}
