use std::sync::Arc;

use async_trait::async_trait;

use super::TransportError;

/// A response as seen by the repository: status line plus raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Builds a `200 OK` response carrying `value` as JSON.
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, "OK", value.to_string())
    }
}

/// Capability for issuing a single request against the event source.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Requests `url` once.
    ///
    /// Returns `Err` only when no response was obtained at all; any status,
    /// including errors, is a successful transport outcome.
    async fn fetch(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<TransportResponse, TransportError> {
        (**self).fetch(url).await
    }
}
