//! CLI command definitions.

pub mod cache;
pub mod events;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eventboard_core::repository::{
    RepositoryConfig, DEFAULT_CACHE_TTL_MINUTES, DEFAULT_EVENTS_URL,
};

use crate::error::Result;
use crate::storage::DEFAULT_CACHE_FILE;

/// Browse sport events and build a conflict-free selection.
#[derive(Debug, Parser)]
#[command(name = "eventboard")]
#[command(version, about = "Browse sport events and build a conflict-free selection", long_about = None)]
pub struct Cli {
    /// Event feed URL.
    #[arg(long, env = "EVENTBOARD_URL", default_value = DEFAULT_EVENTS_URL)]
    pub url: String,

    /// Page URL of a paginated feed, in page order. Overrides --url.
    #[arg(long = "page-url")]
    pub page_urls: Vec<String>,

    /// Minutes a fetched catalog stays cached.
    #[arg(long, env = "EVENTBOARD_CACHE_TTL_MINUTES", default_value_t = DEFAULT_CACHE_TTL_MINUTES)]
    pub cache_ttl_minutes: u32,

    /// File that holds the cache between runs.
    #[arg(long, env = "EVENTBOARD_CACHE_FILE", default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Builds the repository configuration from the source flags.
    pub fn repository_config(&self) -> Result<RepositoryConfig> {
        let config = if self.page_urls.is_empty() {
            RepositoryConfig::single(self.url.clone())?
        } else {
            RepositoryConfig::paged(self.page_urls.clone())?
        };
        Ok(config.with_cache_ttl_minutes(self.cache_ttl_minutes))
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse and select events.
    Events(events::EventsCommand),
    /// Manage the local catalog cache.
    Cache(cache::CacheCommand),
}
