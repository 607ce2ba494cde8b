use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Europe::Vienna;

/// Source of "now" for everything that anchors itself to the current date:
/// recurrence generation, the holiday window and the past-event filter.
/// Injected rather than read from the system clock so tests can pin a date.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Vienna wall clock; all upstream sources publish Vienna-local times.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&Vienna).naive_local()
    }
}

/// Clock pinned to a single instant, for tests.
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
