//! Aggregates recurring dance-event listings from a dozen Viennese dancing
//! schools into one normalized feed. Each school sits behind the
//! [`scraping::EventSource`] contract, whether its events are scraped from
//! HTML, pulled from an undocumented JSON endpoint or generated from a
//! hardcoded weekly schedule; the aggregator fetches all of them in parallel
//! and a failing source costs its own events, never the run.

pub mod clock;
pub mod holiday;
pub mod models;
pub mod output;
pub mod postprocess;
pub mod recurrence;
pub mod scraping;

pub use clock::{Clock, SystemClock};
pub use holiday::HolidayCalendar;
pub use models::DanceEvent;
pub use scraping::{EventSource, RunReport, SourceError};
