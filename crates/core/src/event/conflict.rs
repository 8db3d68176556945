//! Time conflict detection between events.
//!
//! Events occupy half-open intervals `[start_time, end_time)`: an event ending
//! at 11:00 and another starting at 11:00 do not conflict.

use super::types::Event;

/// Returns true if the two events' intervals overlap.
pub fn intervals_overlap(a: &Event, b: &Event) -> bool {
    a.start_time() < b.end_time() && a.end_time() > b.start_time()
}

/// Returns the first event in `selection` that conflicts with `candidate`.
///
/// An entry sharing the candidate's id is skipped, so an already selected
/// event never conflicts with itself.
pub fn find_conflict<'a>(candidate: &Event, selection: &'a [Event]) -> Option<&'a Event> {
    selection
        .iter()
        .filter(|selected| selected.id() != candidate.id())
        .find(|selected| intervals_overlap(candidate, selected))
}

/// Returns true if `candidate` overlaps any other event in `selection`.
pub fn overlaps(candidate: &Event, selection: &[Event]) -> bool {
    find_conflict(candidate, selection).is_some()
}
