//! Pure validation of event feed responses.

use serde::Deserialize;
use serde_json::Value;

use super::http_mapping::classify_status;
use super::{FetchError, TransportResponse};
use crate::event::{Catalog, Event};

/// Turns a transport response into a catalog or the error it represents.
pub fn interpret_response(response: &TransportResponse) -> Result<Catalog, FetchError> {
    if let Some(error) = classify_status(response.status, &response.status_text) {
        return Err(error);
    }
    parse_catalog(&response.body)
}

/// Parses a `{"events": [...]}` body into a catalog.
///
/// The body must be JSON with an `events` array, and every element of that
/// array must be a valid event. A single bad event rejects the whole payload.
pub fn parse_catalog(body: &[u8]) -> Result<Catalog, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

    let events = value
        .get("events")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::MalformedResponse("missing events".to_string()))?;

    events
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            Event::deserialize(raw).map_err(|e| {
                FetchError::MalformedResponse(format!("invalid event at index {}: {}", index, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Catalog::new)
}
