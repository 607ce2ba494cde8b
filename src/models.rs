use chrono::NaiveDateTime;
use serde::Serialize;

/// One dance event, in Vienna local time.
///
/// Values are complete once their adapter returns them; the only later
/// adjustment anywhere in the pipeline is `postprocess::merge_adjacent`
/// extending `ends_at` when an upstream source splits one evening into
/// several back-to-back sessions.
///
/// If both timestamps are present, `ends_at >= starts_at`. Adapters parsing
/// textual end times that read "earlier" than the start (23:00 - 01:00) must
/// roll the end over to the next day before constructing the event.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DanceEvent {
    pub starts_at: NaiveDateTime,
    /// `None` means the source does not publish an end time, not "same as start".
    pub ends_at: Option<NaiveDateTime>,
    pub name: String,
    /// Free text, may contain literal newlines.
    pub description: String,
    /// Entry price in euro cents. `None` means unknown or free, never zero.
    pub price_euro_cent: Option<u32>,
    /// The venue or school the event belongs to, used as grouping key.
    pub dancing_school: String,
    /// Event page if one exists, otherwise the source's generic page.
    pub website: String,
}
