//! Listing state: the catalog as the user sees it.
//!
//! [`EventListing`] ties together a loaded [`Catalog`], the current
//! [`EventFilter`] and the [`SelectionManager`], and derives the rows a
//! presentation layer renders.

use serde::Serialize;
use thiserror::Error;

use crate::event::{
    find_conflict, Catalog, CategoryGroup, Event, EventFilter, EventId, Rejection, SelectionManager,
    SELECTABLE_TOOLTIP,
};

/// A select request named an id the catalog does not hold.
///
/// Rule rejections (conflict, limit) are not errors; see [`EventListing::select`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ListingError {
    #[error("Event {0} is not in the catalog")]
    UnknownEvent(EventId),
}

/// One visible event with the state of its select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow<'a> {
    pub event: &'a Event,
    pub selected: bool,
    pub selectable: bool,
    pub tooltip: &'static str,
    /// The selected event this one overlaps, if that is what blocks it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts_with: Option<&'a Event>,
}

#[derive(Debug, Clone, Default)]
pub struct EventListing {
    catalog: Catalog,
    filter: EventFilter,
    selection: SelectionManager,
}

impl EventListing {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Swaps in a freshly loaded catalog.
    ///
    /// Selected events whose ids are missing from the new catalog are dropped.
    /// The rest stay as they were selected.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.selection
            .retain(|event| catalog.find(event.id()).is_some());
        self.catalog = catalog;
    }

    pub fn set_search_term(&mut self, search_term: impl Into<String>) {
        self.filter.search_term = search_term.into();
    }

    /// Narrows rows to one category. An empty string means all categories.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filter.category = category.into();
    }

    /// Distinct categories of the whole catalog, for the category picker.
    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    /// Rows for the events that pass the current filter, in catalog order.
    pub fn rows(&self) -> Vec<ListingRow<'_>> {
        self.filter
            .apply(&self.catalog)
            .into_iter()
            .map(|event| {
                let rejection = self.selection.rejection(event);
                ListingRow {
                    event,
                    selected: self.selection.is_selected(event.id()),
                    selectable: rejection.is_none(),
                    tooltip: rejection.map_or(SELECTABLE_TOOLTIP, |rejection| rejection.tooltip()),
                    conflicts_with: match rejection {
                        Some(Rejection::TimeConflict) => self.conflict_with(event),
                        _ => None,
                    },
                }
            })
            .collect()
    }

    /// Selects the catalog event with this id.
    ///
    /// Returns the rule that blocked the selection, or `None` once the event
    /// is selected. Only an unknown id is an error.
    pub fn select(&mut self, id: EventId) -> Result<Option<Rejection>, ListingError> {
        let event = self
            .catalog
            .find(id)
            .ok_or(ListingError::UnknownEvent(id))?;
        let rejection = self.selection.rejection(event);
        if rejection.is_none() {
            self.selection.select(event);
        }
        Ok(rejection)
    }

    /// The selected event that `event` overlaps, if any.
    pub fn conflict_with(&self, event: &Event) -> Option<&Event> {
        find_conflict(event, self.selection.events())
    }

    /// Removes the event with this id from the selection.
    pub fn deselect(&mut self, id: EventId) -> bool {
        self.selection.deselect(id)
    }

    pub fn selected_by_category(&self) -> Vec<CategoryGroup<'_>> {
        self.selection.group_by_category()
    }

    /// Clears the selection and the filter. The catalog is kept.
    pub fn teardown(&mut self) {
        self.selection.clear();
        self.filter = EventFilter::default();
    }
}
