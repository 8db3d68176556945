use thiserror::Error;

/// Errors that can occur in a storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage I/O failed: {0}")]
    Io(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
