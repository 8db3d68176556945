use serde::Serialize;

use super::conflict;
use super::types::{Event, EventId};

/// Maximum number of events a user can hold in their selection.
pub const MAX_SELECTED_EVENTS: usize = 3;

/// Tooltip shown on an event that can be added to the selection.
pub const SELECTABLE_TOOLTIP: &str = "Select event";

/// Why an event cannot currently be added to the selection.
///
/// Rejections are not errors: they drive disabled state and tooltip text in
/// the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The event is already part of the selection.
    AlreadySelected,
    /// The event overlaps an already selected event.
    TimeConflict,
    /// The selection already holds [`MAX_SELECTED_EVENTS`] events.
    LimitReached,
}

impl Rejection {
    /// Tooltip text for a disabled select button.
    pub fn tooltip(&self) -> &'static str {
        match self {
            Rejection::AlreadySelected => "Event already selected",
            Rejection::TimeConflict => "Time conflict with another event",
            Rejection::LimitReached => "You can only select upto 3 events",
        }
    }
}

/// Selected events grouped under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub events: Vec<&'a Event>,
}

/// Owns the user's selection and enforces its rules.
///
/// After every call the selection holds at most [`MAX_SELECTED_EVENTS`]
/// events, no two of which share an id or overlap in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected: Vec<Event>,
}

impl SelectionManager {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected events in selection order.
    pub fn events(&self) -> &[Event] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns true if an event with this id is selected.
    pub fn is_selected(&self, id: EventId) -> bool {
        self.selected.iter().any(|event| event.id() == id)
    }

    /// Number of events that can still be added.
    pub fn remaining(&self) -> usize {
        MAX_SELECTED_EVENTS.saturating_sub(self.selected.len())
    }

    /// Returns why `event` cannot be selected, or `None` if it can.
    ///
    /// A time conflict is reported ahead of the selection limit.
    pub fn rejection(&self, event: &Event) -> Option<Rejection> {
        if self.is_selected(event.id()) {
            Some(Rejection::AlreadySelected)
        } else if conflict::overlaps(event, &self.selected) {
            Some(Rejection::TimeConflict)
        } else if self.selected.len() >= MAX_SELECTED_EVENTS {
            Some(Rejection::LimitReached)
        } else {
            None
        }
    }

    /// Returns true if `event` can be added without breaking any rule.
    pub fn can_select(&self, event: &Event) -> bool {
        self.rejection(event).is_none()
    }

    /// Tooltip for the select control of `event`.
    pub fn tooltip(&self, event: &Event) -> &'static str {
        self.rejection(event)
            .map_or(SELECTABLE_TOOLTIP, |rejection| rejection.tooltip())
    }

    /// Adds `event` if allowed. Returns whether it was added.
    pub fn select(&mut self, event: &Event) -> bool {
        if let Some(rejection) = self.rejection(event) {
            tracing::debug!(event_id = %event.id(), ?rejection, "Selection rejected");
            return false;
        }
        self.selected.push(event.clone());
        tracing::debug!(event_id = %event.id(), count = self.selected.len(), "Event selected");
        true
    }

    /// Removes the event with this id. Returns whether anything was removed.
    pub fn deselect(&mut self, id: EventId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|event| event.id() != id);
        before != self.selected.len()
    }

    /// Drops every selected event.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Keeps only the selected events for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Event) -> bool) {
        self.selected.retain(keep);
    }

    /// Groups the selection by category.
    ///
    /// Categories appear in the order they were first introduced into the
    /// selection; events keep selection order within their group.
    pub fn group_by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        for event in &self.selected {
            match groups
                .iter_mut()
                .find(|group| group.category == event.category())
            {
                Some(group) => group.events.push(event),
                None => groups.push(CategoryGroup {
                    category: event.category(),
                    events: vec![event],
                }),
            }
        }
        groups
    }
}
