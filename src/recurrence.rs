use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::clock::Clock;
use crate::holiday::HolidayCalendar;
use crate::models::DanceEvent;

/// Number of weekly occurrences generated when a schedule does not say
/// otherwise. Nine weeks matches how far ahead the live sources publish.
pub const DEFAULT_WEEKS: usize = 9;

/// A repeating weekly slot. The time of day comes from the template event
/// handed to [`Recurrence::weekly`], this struct only decides which dates
/// qualify.
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub weeks: usize,
    /// Skip (never shift) occurrences that fall on a public holiday.
    pub exclude_holidays: bool,
    /// 1-indexed weeks of the month; `Some(vec![1, 3])` keeps only the first
    /// and third occurrence of the weekday in each month.
    pub weeks_of_month: Option<Vec<u32>>,
}

impl WeeklySchedule {
    pub fn on(weekday: Weekday) -> Self {
        Self {
            weekday,
            weeks: DEFAULT_WEEKS,
            exclude_holidays: false,
            weeks_of_month: None,
        }
    }
}

/// Generates concrete event instances from weekly schedules. Holds the shared
/// holiday calendar and clock so the hardcoded-schedule adapters do not reach
/// for process-wide state.
#[derive(Clone)]
pub struct Recurrence {
    clock: Arc<dyn Clock>,
    holidays: Arc<HolidayCalendar>,
}

impl Recurrence {
    pub fn new(clock: Arc<dyn Clock>, holidays: Arc<HolidayCalendar>) -> Self {
        Self { clock, holidays }
    }

    /// One event per qualifying occurrence of `schedule.weekday`, starting
    /// with the next occurrence on or after today. The template supplies
    /// everything except the dates; its `starts_at`/`ends_at` contribute only
    /// their time of day, both placed on the same calendar day.
    pub fn weekly(&self, schedule: &WeeklySchedule, template: &DanceEvent) -> Vec<DanceEvent> {
        let first = next_weekday(self.clock.today(), schedule.weekday);

        let mut events = Vec::new();
        for week in 0..schedule.weeks {
            let day = first + Duration::weeks(week as i64);

            if schedule.exclude_holidays && self.holidays.contains(day) {
                continue;
            }
            if let Some(weeks) = &schedule.weeks_of_month {
                if !weeks.contains(&week_of_month(day)) {
                    continue;
                }
            }

            events.push(DanceEvent {
                starts_at: day.and_time(template.starts_at.time()),
                ends_at: template.ends_at.map(|ends_at| day.and_time(ends_at.time())),
                ..template.clone()
            });
        }

        events
    }
}

/// Time-of-day anchor for schedule templates. The date part is a placeholder
/// that [`Recurrence::weekly`] replaces with each occurrence's date.
pub fn template_time(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .expect("valid anchor date")
        .and_time(NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time of day"))
}

/// Drops events fully contained in `[start, end]`, the carve-out used to
/// suppress recurring events during semester holidays before appending
/// hand-authored replacements. Events overlapping only one edge of the
/// window stay, as do events without an end time (containment needs one).
pub fn remove_events_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    events: Vec<DanceEvent>,
) -> Vec<DanceEvent> {
    events
        .into_iter()
        .filter(|event| {
            event.starts_at < start || event.ends_at.map_or(true, |ends_at| ends_at > end)
        })
        .collect()
}

fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(i64::from(ahead))
}

fn week_of_month(day: NaiveDate) -> u32 {
    (day.day() - 1) / 7 + 1
}
