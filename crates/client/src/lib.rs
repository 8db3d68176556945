//! eventboard_client - CLI client for the eventboard event listing.

pub mod cli;
pub mod error;
pub mod output;
pub mod storage;
pub mod transport;

pub use error::{ClientError, Result};
pub use storage::FileStorage;
pub use transport::HttpTransport;
