//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use eventboard_core::repository::{Transport, TransportError, TransportResponse};

use crate::error::Result;

/// [`Transport`] that issues plain GET requests.
///
/// Non-success statuses are returned as responses, not errors; only failures
/// to obtain a response at all become [`TransportError`]s.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default reqwest client.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("eventboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Create a transport over an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> std::result::Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        tracing::trace!(%url, status = status.as_u16(), bytes = body.len(), "HTTP response received");
        Ok(TransportResponse::new(status.as_u16(), status_text, body.to_vec()))
    }
}
