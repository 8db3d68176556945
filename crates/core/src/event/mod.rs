mod error;
mod types;

pub mod conflict;
pub mod filter;
pub mod selection;

pub use conflict::{find_conflict, intervals_overlap, overlaps};
pub use error::EventError;
pub use filter::{categories, filter_events, EventFilter};
pub use selection::{
    CategoryGroup, Rejection, SelectionManager, MAX_SELECTED_EVENTS, SELECTABLE_TOOLTIP,
};
pub use types::{Catalog, Event, EventId};
