use super::FetchError;

/// Lifecycle of the most recent catalog load.
///
/// `Idle -> Loading -> {Success, Failed}`. A cancelled load returns to the
/// state it started from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed(FetchError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Returns the error of a failed load.
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadState::Failed(error) => Some(error),
            _ => None,
        }
    }
}
