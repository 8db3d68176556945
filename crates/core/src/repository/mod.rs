//! Fetching the event catalog from its HTTP source.
//!
//! Status classification and payload validation are pure functions; the
//! [`EventRepository`] combines them with a [`Transport`] and a cache.

mod config;
mod error;
mod http_mapping;
mod pager;
mod payload;
#[allow(clippy::module_inception)]
mod repository;
mod state;
mod traits;

pub use config::{CatalogSource, RepositoryConfig, DEFAULT_CACHE_TTL_MINUTES, DEFAULT_EVENTS_URL};
pub use error::{ConfigError, FetchError, TransportError, NETWORK_ERROR_MESSAGE};
pub use http_mapping::classify_status;
pub use pager::Pager;
pub use payload::{interpret_response, parse_catalog};
pub use repository::EventRepository;
pub use state::LoadState;
pub use traits::{Transport, TransportResponse};
