//! JSON output formatting.

use eventboard_core::event::CategoryGroup;
use eventboard_core::repository::FetchError;
use eventboard_core::EventListing;
use serde::Serialize;

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

/// Format a fetch error as a JSON object.
pub fn format_fetch_error(error: &FetchError) -> String {
    let detail = match error {
        FetchError::Network { detail } => Some(detail.as_str()),
        _ => None,
    };
    format_json(&ErrorBody {
        error: error.message(),
        status: error.status(),
        detail,
    })
}

#[derive(Serialize)]
struct SelectionBody<'a> {
    count: usize,
    remaining: usize,
    groups: Vec<CategoryGroup<'a>>,
}

/// Format a grouped selection with its size and the slots left.
pub fn format_selection(listing: &EventListing) -> String {
    let selection = listing.selection();
    format_json(&SelectionBody {
        count: selection.len(),
        remaining: selection.remaining(),
        groups: listing.selected_by_category(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventboard_core::event::{Catalog, Event, EventId};

    #[test]
    fn test_format_fetch_error() {
        let json = format_fetch_error(&FetchError::Client {
            status: 404,
            status_text: "Not Found".to_string(),
        });
        assert_eq!(json, r#"{"error":"Client Error 404: Not Found","status":404}"#);
    }

    #[test]
    fn test_format_network_error_keeps_detail() {
        let json = format_fetch_error(&FetchError::Network {
            detail: "connection refused".to_string(),
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], serde_json::Value::Null);
        assert_eq!(value["detail"], "connection refused");
    }

    #[test]
    fn test_format_empty_selection() {
        let listing = EventListing::new(Catalog::new(Vec::new()));
        assert_eq!(
            format_selection(&listing),
            r#"{"count":0,"remaining":3,"groups":[]}"#
        );
    }

    #[test]
    fn test_format_selection_counts_remaining() {
        let start = Utc.with_ymd_and_hms(2022, 12, 17, 13, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2022, 12, 17, 14, 0, 0).unwrap();
        let mut listing = EventListing::new(Catalog::new(vec![Event::new(
            EventId(1),
            "Butterfly 100M",
            "Swimming",
            start,
            end,
        )
        .unwrap()]));
        assert_eq!(listing.select(EventId(1)), Ok(None));

        let value: serde_json::Value = serde_json::from_str(&format_selection(&listing)).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["remaining"], 2);
        assert_eq!(value["groups"][0]["category"], "Swimming");
    }
}
