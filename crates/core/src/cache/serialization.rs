//! Pure functions for encoding cache entries as storage strings.
//!
//! Entries are stored as JSON envelopes of the form
//! `{"data": <value>, "expiration": <epoch millis>}` so that a stored value can
//! be inspected by hand and read back by any client sharing the same store.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to a string.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize a string to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// A cached value and the instant after which it is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    #[serde(rename = "data")]
    pub value: T,
    #[serde(rename = "expiration", with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Returns true once `now` is past the expiration instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Serializes a cache entry to its JSON envelope.
pub fn serialize_entry<T: Serialize>(entry: &CacheEntry<T>) -> Result<String> {
    serde_json::to_string(entry).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes a JSON envelope into a cache entry.
pub fn deserialize_entry<T: DeserializeOwned>(raw: &str) -> Result<CacheEntry<T>> {
    serde_json::from_str(raw).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
