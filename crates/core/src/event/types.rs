use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::EventError;

/// Identifier assigned to an event by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single listed event.
///
/// Events are immutable once built. The constructor and the deserializer both
/// enforce `start_time < end_time`, so every `Event` in a catalog or selection
/// describes a non-empty half-open interval `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord")]
pub struct Event {
    id: EventId,
    #[serde(rename = "event_name")]
    name: String,
    #[serde(rename = "event_category")]
    category: String,
    #[serde(with = "crate::serde::event_time")]
    start_time: DateTime<Utc>,
    #[serde(with = "crate::serde::event_time")]
    end_time: DateTime<Utc>,
}

/// Wire shape of an event, validated into [`Event`].
#[derive(Deserialize)]
struct EventRecord {
    id: EventId,
    event_name: String,
    event_category: String,
    #[serde(deserialize_with = "crate::serde::event_time::deserialize")]
    start_time: DateTime<Utc>,
    #[serde(deserialize_with = "crate::serde::event_time::deserialize")]
    end_time: DateTime<Utc>,
}

impl TryFrom<EventRecord> for Event {
    type Error = EventError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        Event::new(
            record.id,
            record.event_name,
            record.event_category,
            record.start_time,
            record.end_time,
        )
    }
}

impl Event {
    /// Creates a new event, validating that it ends after it starts.
    pub fn new(
        id: EventId,
        name: impl Into<String>,
        category: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, EventError> {
        if end_time <= start_time {
            return Err(EventError::InvalidTimeRange(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            category: category.into(),
            start_time,
            end_time,
        })
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}

/// The ordered list of events returned by the feed.
///
/// A catalog is shared, not copied: cloning one is an `Arc` bump. It is never
/// mutated in place; a new fetch produces a new catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog(Arc<[Event]>);

impl Catalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self(events.into())
    }

    /// Returns the events in feed order.
    pub fn events(&self) -> &[Event] {
        &self.0
    }

    /// Finds an event by id.
    pub fn find(&self, id: EventId) -> Option<&Event> {
        self.0.iter().find(|event| event.id == id)
    }

    /// Returns the distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        super::filter::categories(&self.0)
    }
}

impl Deref for Catalog {
    type Target = [Event];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Event>> for Catalog {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<Event> for Catalog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Event>::deserialize(deserializer).map(Catalog::new)
    }
}
