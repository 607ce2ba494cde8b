pub mod ballsaal;
pub mod base;
pub mod chris;
pub mod dance4fun;
pub mod dimitarstefanin;
pub mod dorner;
pub mod immervoll;
pub mod kopetzky;
pub mod rueff;
pub mod schwebach;
pub mod stanek;
pub mod strobl;
pub mod svabek;

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::NaiveDateTime;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::clock::Clock;
use crate::models::DanceEvent;
use crate::postprocess;
use crate::recurrence::Recurrence;

/// The ways fetching one source is expected to fail. Everything else (bad
/// schedules, poisoned locks) is a bug and panics instead of being folded
/// into the run report.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {url}: {detail}")]
    Shape { url: String, detail: String },
}

impl SourceError {
    pub fn request(url: &str, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            source,
        }
    }

    pub fn shape(url: &str, detail: impl Into<String>) -> Self {
        Self::Shape {
            url: url.to_string(),
            detail: detail.into(),
        }
    }
}

/// One upstream source of dance events. Implementations either scrape a
/// website/API or derive events from a hardcoded weekly schedule; either way
/// the rest of the pipeline only ever sees this contract.
pub trait EventSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn website(&self) -> &'static str;
    fn produce(&self) -> Result<Vec<DanceEvent>, SourceError>;
}

/// Statistics and diagnostics from one full aggregation pass.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Number of events left after dropping past ones.
    pub event_count: usize,
    pub started_at: NaiveDateTime,
    pub duration_seconds: f64,
    /// One line per failed source.
    pub errors: Vec<String>,
}

/// Every source currently aggregated, roughly one per Viennese dancing
/// school. Order is irrelevant; the post-processing sort decides the output
/// order.
pub fn active_sources(
    recurrence: &Recurrence,
    clock: Arc<dyn Clock>,
) -> Vec<Box<dyn EventSource>> {
    vec![
        Box::new(ballsaal::Ballsaal),
        Box::new(chris::Chris),
        Box::new(dance4fun::Dance4Fun),
        Box::new(dimitarstefanin::DimitarStefanin::new(recurrence.clone())),
        Box::new(dorner::Dorner::new(recurrence.clone())),
        Box::new(immervoll::Immervoll),
        Box::new(kopetzky::Kopetzky::new(recurrence.clone())),
        Box::new(rueff::Rueff),
        Box::new(schwebach::Schwebach),
        Box::new(stanek::Stanek::new(clock)),
        Box::new(strobl::Strobl::new(recurrence.clone())),
        Box::new(svabek::Svabek::new(recurrence.clone())),
    ]
}

/// Fetches every source on its own thread and concatenates what succeeds.
/// A failing source contributes one error line instead of aborting the run;
/// results arrive in completion order, which is fine because ordering is
/// established later by the chronological sort.
pub fn collect_events(sources: &[Box<dyn EventSource>]) -> (Vec<DanceEvent>, Vec<String>) {
    let mut events = Vec::new();
    let mut errors = Vec::new();

    thread::scope(|scope| {
        let (sender, receiver) = mpsc::channel();
        for source in sources {
            let sender = sender.clone();
            scope.spawn(move || {
                let outcome = source.produce();
                // The receiver only disconnects if collection already ended.
                let _ = sender.send((source.name(), outcome));
            });
        }
        drop(sender);

        for (name, outcome) in receiver {
            match outcome {
                Ok(mut scraped) => {
                    info!("{name}: {} events", scraped.len());
                    events.append(&mut scraped);
                }
                Err(err) => {
                    warn!("{name}: {err}");
                    errors.push(format!("{name}: {err}"));
                }
            }
        }
    });

    (events, errors)
}

/// One full aggregation pass: fetch everything, drop past events, sort.
pub fn run_all(sources: &[Box<dyn EventSource>], clock: &dyn Clock) -> (Vec<DanceEvent>, RunReport) {
    let started_at = clock.now();
    let timer = Instant::now();

    let (events, errors) = collect_events(sources);
    let mut events = postprocess::upcoming(events, clock.today());
    postprocess::sort_chronological(&mut events);

    let report = RunReport {
        event_count: events.len(),
        started_at,
        duration_seconds: timer.elapsed().as_secs_f64(),
        errors,
    };
    (events, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    struct Fixed {
        name: &'static str,
        starts_at: NaiveDateTime,
    }

    impl EventSource for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn website(&self) -> &'static str {
            "https://example.com"
        }

        fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
            Ok(vec![DanceEvent {
                starts_at: self.starts_at,
                ends_at: None,
                name: "Perfektion".to_string(),
                description: String::new(),
                price_euro_cent: None,
                dancing_school: self.name.to_string(),
                website: self.website().to_string(),
            }])
        }
    }

    struct Broken;

    impl EventSource for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn website(&self) -> &'static str {
            "https://broken.example.com"
        }

        fn produce(&self) -> Result<Vec<DanceEvent>, SourceError> {
            Err(SourceError::Status {
                url: self.website().to_string(),
                status: 503,
            })
        }
    }

    fn at(d: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    #[test]
    fn one_failing_source_does_not_abort_the_others() {
        let sources: Vec<Box<dyn EventSource>> = vec![
            Box::new(Fixed {
                name: "first",
                starts_at: at(12, 20),
            }),
            Box::new(Broken),
            Box::new(Fixed {
                name: "third",
                starts_at: at(11, 19),
            }),
        ];

        let (events, errors) = collect_events(&sources);

        assert_eq!(events.len(), 2);
        let mut schools: Vec<&str> = events
            .iter()
            .map(|event| event.dancing_school.as_str())
            .collect();
        schools.sort_unstable();
        assert_eq!(schools, vec!["first", "third"]);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("broken: "));
        assert!(errors[0].contains("503"));
        assert!(errors[0].contains("https://broken.example.com"));
    }

    #[test]
    fn run_all_filters_sorts_and_reports() {
        let sources: Vec<Box<dyn EventSource>> = vec![
            Box::new(Fixed {
                name: "later",
                starts_at: at(12, 20),
            }),
            Box::new(Fixed {
                name: "stale",
                starts_at: at(9, 12),
            }),
            Box::new(Fixed {
                name: "sooner",
                starts_at: at(11, 19),
            }),
            Box::new(Broken),
        ];
        let clock = FixedClock(at(10, 8));

        let (events, report) = run_all(&sources, &clock);

        let schools: Vec<&str> = events
            .iter()
            .map(|event| event.dancing_school.as_str())
            .collect();
        assert_eq!(schools, vec!["sooner", "later"]);
        assert_eq!(report.event_count, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.started_at, at(10, 8));
    }
}
