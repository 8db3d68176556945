//! eventboard_core - event catalog, filtering and selection rules.
//!
//! Everything in this crate is generic over the capabilities it needs
//! (a [`repository::Transport`], a [`cache::Storage`] and a [`cache::Clock`]),
//! so it runs the same way behind a CLI, a test harness or any other shell.

pub mod cache;
pub mod event;
pub mod listing;
pub mod repository;
pub mod serde;

pub use listing::{EventListing, ListingError, ListingRow};
