//! Pure functions for mapping HTTP statuses to fetch errors.
//!
//! Statuses below 400 are not errors here: anything that is not a client or
//! server error goes on to have its body parsed.

use super::FetchError;

/// Maps an HTTP status to the [`FetchError`] it represents, if any.
///
/// - `400..=499` -> [`FetchError::Client`]
/// - `500..` -> [`FetchError::Server`]
/// - anything else -> `None`
///
/// # Examples
///
/// ```
/// use eventboard_core::repository::{classify_status, FetchError};
///
/// assert_eq!(
///     classify_status(404, "Not Found"),
///     Some(FetchError::Client { status: 404, status_text: "Not Found".to_string() })
/// );
/// assert_eq!(classify_status(200, "OK"), None);
/// ```
pub fn classify_status(status: u16, status_text: &str) -> Option<FetchError> {
    match status {
        400..=499 => Some(FetchError::Client {
            status,
            status_text: status_text.to_string(),
        }),
        500.. => Some(FetchError::Server {
            status,
            status_text: status_text.to_string(),
        }),
        _ => None,
    }
}
