use chrono::NaiveDate;

use crate::models::DanceEvent;

/// Collapses back-to-back sessions that an upstream source lists as separate
/// entries of the same event. Events are sorted by start, then an event is
/// folded into the previously kept one when the names match and it starts no
/// later than the kept event ends; the kept event's end extends to the later
/// of the two. Idempotent: a second pass finds nothing left to merge.
pub fn merge_adjacent(mut events: Vec<DanceEvent>) -> Vec<DanceEvent> {
    events.sort_by_key(|event| event.starts_at);

    let mut merged: Vec<DanceEvent> = Vec::with_capacity(events.len());
    for event in events {
        if let Some(last) = merged.last_mut() {
            let contiguous = last.name == event.name
                && last
                    .ends_at
                    .map_or(false, |ends_at| event.starts_at <= ends_at);
            if contiguous {
                if let Some(ends_at) = event.ends_at {
                    last.ends_at = Some(last.ends_at.map_or(ends_at, |kept| kept.max(ends_at)));
                }
                continue;
            }
        }
        merged.push(event);
    }

    merged
}

/// Drops events that started before today's midnight.
pub fn upcoming(events: Vec<DanceEvent>, today: NaiveDate) -> Vec<DanceEvent> {
    let midnight = today.and_hms_opt(0, 0, 0).expect("midnight exists");
    events
        .into_iter()
        .filter(|event| event.starts_at >= midnight)
        .collect()
}

/// Final user-visible ordering. The sort is stable, so events with equal
/// start times keep the order their adapters produced them in.
pub fn sort_chronological(events: &mut [DanceEvent]) {
    events.sort_by_key(|event| event.starts_at);
}
