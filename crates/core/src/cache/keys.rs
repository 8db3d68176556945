/// Cache key for the full event catalog.
pub const EVENTS_KEY: &str = "events";

/// Returns the cache key for the full event catalog.
pub fn events_key() -> String {
    EVENTS_KEY.to_string()
}

/// Returns the cache key for one page of a paginated catalog.
pub fn events_page_key(page: usize) -> String {
    format!("{}:page:{}", EVENTS_KEY, page)
}
