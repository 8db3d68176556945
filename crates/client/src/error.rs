//! Client error types.

use eventboard_core::repository::ConfigError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while setting up the client.
///
/// Fetch failures are not listed here: they are rendered to the user as part
/// of normal output.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP client setup failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
