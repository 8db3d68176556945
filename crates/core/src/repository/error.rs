use thiserror::Error;

/// User-facing text for a fetch that never got a response.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Unable to reach the API. Please check your internet connection.";

/// Why a catalog fetch failed.
///
/// Every variant is terminal for the attempt that produced it. The `Display`
/// output is meant to be shown to the user as is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response could be obtained.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network { detail: String },
    /// The source answered with a 4xx status.
    #[error("Client Error {status}: {status_text}")]
    Client { status: u16, status_text: String },
    /// The source answered with a 5xx status.
    #[error("Server Error {status}: {status_text}")]
    Server { status: u16, status_text: String },
    /// The source answered but the body is not a valid event payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Returns the message to surface to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the HTTP status for client and server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Client { status, .. } | FetchError::Server { status, .. } => Some(*status),
            FetchError::Network { .. } | FetchError::MalformedResponse(_) => None,
        }
    }
}

/// A transport could not produce a response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Transport failed: {0}")]
pub struct TransportError(pub String);

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::Network { detail: err.0 }
    }
}

/// Errors raised while building a repository configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("A paginated source needs at least one page URL")]
    EmptyPageList,
    #[error("Source URL cannot be empty")]
    EmptyUrl,
}
