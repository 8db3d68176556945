use thiserror::Error;

use super::EventId;

/// Errors that can occur when constructing or validating an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event {0} must end after it starts")]
    InvalidTimeRange(EventId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_error_display() {
        assert_eq!(
            EventError::InvalidTimeRange(EventId(7)).to_string(),
            "Event 7 must end after it starts"
        );
    }
}
