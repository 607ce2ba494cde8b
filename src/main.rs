use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use dancetime::clock::{Clock, SystemClock};
use dancetime::holiday::HolidayCalendar;
use dancetime::recurrence::Recurrence;
use dancetime::{output, scraping};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    // No holidays means wrongly generated events, so failing here beats
    // carrying on without them.
    let holidays = HolidayCalendar::load(Path::new("holiday.csv"), clock.today())
        .context("loading the holiday calendar")?;
    let recurrence = Recurrence::new(clock.clone(), Arc::new(holidays));

    let sources = scraping::active_sources(&recurrence, clock.clone());
    let (events, report) = scraping::run_all(&sources, clock.as_ref());

    output::write_csv_file(Path::new("events.csv"), &events)?;
    output::write_json_file(Path::new("events.json"), &events)?;

    for error in &report.errors {
        warn!("source failed: {error}");
    }
    info!(
        "collected {} events from {} sources in {:.1}s ({} failed)",
        report.event_count,
        sources.len(),
        report.duration_seconds,
        report.errors.len()
    );
    Ok(())
}
