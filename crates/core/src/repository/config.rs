use super::ConfigError;

/// Event feed used when no source is configured.
pub const DEFAULT_EVENTS_URL: &str = "https://run.mocky.io/v3/47844f0d-e958-459a-b50e-b65f7d6783e5";

/// How long a fetched catalog stays fresh in the cache.
pub const DEFAULT_CACHE_TTL_MINUTES: u32 = 60;

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// One endpoint serving the whole catalog, cached under a single key.
    Single(String),
    /// One endpoint per page, each page cached under its own key.
    Paged(Vec<String>),
}

/// Configuration for an [`EventRepository`](super::EventRepository).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    source: CatalogSource,
    cache_ttl_minutes: u32,
}

impl RepositoryConfig {
    /// Configures a single-endpoint source.
    pub fn single(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        Ok(Self {
            source: CatalogSource::Single(url),
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
        })
    }

    /// Configures a paginated source, one URL per page in page order.
    pub fn paged(urls: Vec<String>) -> Result<Self, ConfigError> {
        if urls.is_empty() {
            return Err(ConfigError::EmptyPageList);
        }
        if urls.iter().any(|url| url.trim().is_empty()) {
            return Err(ConfigError::EmptyUrl);
        }
        Ok(Self {
            source: CatalogSource::Paged(urls),
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
        })
    }

    /// Sets the cache time to live.
    pub fn with_cache_ttl_minutes(mut self, minutes: u32) -> Self {
        self.cache_ttl_minutes = minutes;
        self
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn cache_ttl_minutes(&self) -> u32 {
        self.cache_ttl_minutes
    }

    /// Number of pages the source serves (1 for a single endpoint).
    pub fn page_count(&self) -> usize {
        match &self.source {
            CatalogSource::Single(_) => 1,
            CatalogSource::Paged(urls) => urls.len(),
        }
    }

    /// URL of a 1-based page, if it exists.
    pub fn page_url(&self, page: usize) -> Option<&str> {
        match &self.source {
            CatalogSource::Single(url) => (page == 1).then_some(url.as_str()),
            CatalogSource::Paged(urls) => page
                .checked_sub(1)
                .and_then(|index| urls.get(index))
                .map(String::as_str),
        }
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Single(DEFAULT_EVENTS_URL.to_string()),
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
        }
    }
}
