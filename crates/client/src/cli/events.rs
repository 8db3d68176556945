//! Events CLI commands.

use clap::{Args, Parser, Subcommand};

/// Event browsing commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// Search and category narrowing shared by listing commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive substring of the event name.
    #[arg(long, default_value = "")]
    pub search: String,
    /// Exact category name. Empty means all categories.
    #[arg(long, default_value = "")]
    pub category: String,
}

/// Available events actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List events with the state of their select control.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Page of a paginated feed.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Event IDs to treat as already selected, in selection order.
        #[arg(long = "selected", value_delimiter = ',')]
        selected: Vec<u64>,
    },
    /// List the distinct event categories.
    Categories {
        /// Page of a paginated feed.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Select events in order and show the resulting selection.
    Select {
        /// Event IDs to select.
        #[arg(required = true)]
        ids: Vec<u64>,
        /// Page of a paginated feed.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Drop the cached catalog and fetch it again.
    Refresh {
        /// Page of a paginated feed.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}
