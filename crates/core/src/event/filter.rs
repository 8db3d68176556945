use serde::{Deserialize, Serialize};

use super::types::Event;

/// Search and category criteria applied to a catalog.
///
/// An empty field disables that criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub search_term: String,
    pub category: String,
}

impl EventFilter {
    pub fn new(search_term: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            category: category.into(),
        }
    }

    /// Returns true if neither criterion is set.
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.category.is_empty()
    }

    /// Returns true if the event satisfies both criteria.
    pub fn matches(&self, event: &Event) -> bool {
        let needle = self.search_term.to_lowercase();
        matches_criteria(event, &needle, &self.category)
    }

    /// Returns the matching events, in catalog order.
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|event| self.matches(event)).collect()
    }
}

fn matches_criteria(event: &Event, needle: &str, category: &str) -> bool {
    (needle.is_empty() || event.name().to_lowercase().contains(needle))
        && (category.is_empty() || event.category() == category)
}

/// Filters events by name substring (case-insensitive) and exact category.
///
/// Both criteria are ANDed; an empty `search_term` or `category` disables the
/// corresponding check. Order is preserved.
pub fn filter_events<'a>(events: &'a [Event], search_term: &str, category: &str) -> Vec<&'a Event> {
    let needle = search_term.to_lowercase();
    events
        .iter()
        .filter(|event| matches_criteria(event, &needle, category))
        .collect()
}

/// Returns the distinct categories of `events` in first-seen order.
pub fn categories(events: &[Event]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for event in events {
        if !seen.contains(&event.category()) {
            seen.push(event.category());
        }
    }
    seen
}
