use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{Days, NaiveDate};

/// Austrian public holidays, loaded once at startup and shared read-only
/// across every adapter that excludes holidays.
///
/// The source file is the official federal holiday CSV from
/// https://www.data.gv.at/katalog/en/dataset/3deb9da7-8394-4797-9f32-5ca95281ba5b
/// which covers roughly the next ten years, so shipping a checked-in copy is
/// more durable than scraping it would be. Only rows of type `HF` (federal
/// holidays) inside the rolling window `today < date < today + 365 days` are
/// kept; nothing in the pipeline looks further ahead than nine weeks.
pub struct HolidayCalendar {
    days: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Reads the holiday CSV. Failure here is fatal for the whole run: there
    /// is no silent "no holidays" fallback, since that would silently emit
    /// recurring events on days the schools are closed.
    pub fn load(path: &Path, today: NaiveDate) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read holiday file {}", path.display()))?;
        let days = parse_csv(&text, today)?;
        Ok(Self { days })
    }

    /// Calendar built from explicit dates, for tests and one-off overrides.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            days: dates.into_iter().collect(),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

fn parse_csv(text: &str, today: NaiveDate) -> Result<HashSet<NaiveDate>> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| anyhow!("holiday file is empty"))?;

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let date_column = column_index(&columns, "DATUM")?;
    let type_column = column_index(&columns, "TYP")?;

    let horizon = today
        .checked_add_days(Days::new(365))
        .ok_or_else(|| anyhow!("holiday window overflows the calendar"))?;

    let mut days = HashSet::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let kind = fields
            .get(type_column)
            .ok_or_else(|| anyhow!("holiday row is missing the TYP column: {line}"))?;
        if *kind != "HF" {
            continue;
        }
        let raw_date = fields
            .get(date_column)
            .ok_or_else(|| anyhow!("holiday row is missing the DATUM column: {line}"))?;
        let day = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .with_context(|| format!("invalid holiday date: {raw_date}"))?;

        // Both bounds exclusive: today itself is not upcoming, and the file
        // does not need to be authoritative beyond one year out.
        if today < day && day < horizon {
            days.insert(day);
        }
    }

    Ok(days)
}

fn column_index(columns: &[&str], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|column| *column == name)
        .ok_or_else(|| anyhow!("holiday file has no {name} column"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
DATUM,TYP,NAME
2024-01-01,HF,Neujahr
2024-02-14,NF,Valentinstag
2024-05-01,HF,Staatsfeiertag
2024-12-25,HF,Christtag
2026-01-01,HF,Neujahr
";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn keeps_only_federal_holidays_in_window() {
        let days = parse_csv(SAMPLE_CSV, day(2024, 3, 1)).expect("parse holidays");
        assert!(days.contains(&day(2024, 5, 1)));
        assert!(days.contains(&day(2024, 12, 25)));
        // Not HF.
        assert!(!days.contains(&day(2024, 2, 14)));
        // In the past and beyond the one-year window.
        assert!(!days.contains(&day(2024, 1, 1)));
        assert!(!days.contains(&day(2026, 1, 1)));
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let csv = "DATUM,TYP\n2024-03-01,HF\n2025-03-01,HF\n2024-03-02,HF\n";
        let days = parse_csv(csv, day(2024, 3, 1)).expect("parse holidays");
        assert!(!days.contains(&day(2024, 3, 1)));
        assert!(!days.contains(&day(2025, 3, 1)));
        assert!(days.contains(&day(2024, 3, 2)));
    }

    #[test]
    fn missing_column_is_an_error() {
        assert!(parse_csv("DATUM,NAME\n2024-01-01,Neujahr\n", day(2024, 3, 1)).is_err());
    }

    #[test]
    fn bad_date_is_an_error() {
        assert!(parse_csv("DATUM,TYP\nnot-a-date,HF\n", day(2024, 3, 1)).is_err());
    }
}
