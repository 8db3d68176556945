//! Serde helpers for the event feed's wire formats.
//!
//! The feed encodes instants as `YYYY-MM-DD HH:MM:SS` without an offset.
//! Those values are read as UTC so that every event lives on the same
//! timeline regardless of where the listing is rendered.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format for event start/end times.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a feed timestamp into an absolute instant.
pub fn parse_event_time(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), EVENT_TIME_FORMAT).map(|naive| naive.and_utc())
}

/// Formats an instant using the feed's timestamp format.
pub fn format_event_time(value: &DateTime<Utc>) -> String {
    value.format(EVENT_TIME_FORMAT).to_string()
}

/// `#[serde(with = "...")]` module for [`EVENT_TIME_FORMAT`] timestamps.
pub mod event_time {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_event_time(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_event_time(&s).map_err(|e| {
            serde::de::Error::custom(format!("invalid event time {:?}: {}", s, e))
        })
    }
}
