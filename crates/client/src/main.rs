//! eventboard CLI entry point.

use anyhow::Result;
use clap::Parser;
use eventboard_client::cli::cache::CacheAction;
use eventboard_client::cli::events::EventsAction;
use eventboard_client::cli::{Cli, Commands, OutputFormat};
use eventboard_client::output::{format_output, json, pretty};
use eventboard_client::{FileStorage, HttpTransport};
use eventboard_core::event::{Catalog, EventId};
use eventboard_core::repository::{EventRepository, FetchError};
use eventboard_core::EventListing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repository = EventRepository<HttpTransport, FileStorage>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventboard=warn,eventboard_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let repository = EventRepository::new(
        HttpTransport::new()?,
        FileStorage::new(&cli.cache_file),
        cli.repository_config()?,
    );

    match &cli.command {
        Commands::Events(events_cmd) => match &events_cmd.action {
            EventsAction::List {
                filter,
                page,
                selected,
            } => {
                let Some(catalog) = load(&cli, &repository, *page, false).await else {
                    std::process::exit(1);
                };
                let mut listing = EventListing::new(catalog);
                for id in selected {
                    match listing.select(EventId(*id)) {
                        Ok(None) => {}
                        Ok(Some(rejection)) => {
                            tracing::warn!(event_id = id, reason = rejection.tooltip(), "Ignoring preselected event");
                        }
                        Err(err) => {
                            tracing::warn!(event_id = id, error = %err, "Ignoring preselected event");
                        }
                    }
                }
                listing.set_search_term(filter.search.as_str());
                listing.set_category(filter.category.as_str());

                let rows = listing.rows();
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&rows, cli.format)),
                    OutputFormat::Pretty => {
                        let mut pager = repository.pager();
                        pager.go_to(*page);
                        println!("{}", pretty::format_rows(&rows, &pager));
                    }
                }
            }
            EventsAction::Categories { page } => {
                let Some(catalog) = load(&cli, &repository, *page, false).await else {
                    std::process::exit(1);
                };
                let categories = catalog.categories();
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&categories, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_categories(&categories)),
                }
            }
            EventsAction::Select { ids, page } => {
                let Some(catalog) = load(&cli, &repository, *page, false).await else {
                    std::process::exit(1);
                };
                let mut listing = EventListing::new(catalog);
                for id in ids {
                    let id = EventId(*id);
                    let outcome = listing.select(id);
                    if !cli.quiet && matches!(cli.format, OutputFormat::Pretty) {
                        println!("{}", pretty::format_select_outcome(&listing, id, outcome));
                    }
                }

                match cli.format {
                    OutputFormat::Json => println!("{}", json::format_selection(&listing)),
                    OutputFormat::Pretty => println!("\n{}", pretty::format_selection(&listing)),
                }
            }
            EventsAction::Refresh { page } => {
                let Some(catalog) = load(&cli, &repository, *page, true).await else {
                    std::process::exit(1);
                };
                if !cli.quiet {
                    println!("Fetched {} events", catalog.len());
                }
            }
        },
        Commands::Cache(cache_cmd) => match cache_cmd.action {
            CacheAction::Clear => {
                repository.clear_cache();
                if !cli.quiet {
                    println!("Cleared cache in {}", cli.cache_file.display());
                }
            }
        },
    }

    Ok(())
}

/// Loads one page of the catalog, printing the error if the fetch fails.
async fn load(cli: &Cli, repository: &Repository, page: usize, refresh: bool) -> Option<Catalog> {
    let result = if refresh {
        repository.refresh_page(page).await
    } else {
        repository.load_page(page).await
    };
    result.map_err(|err| report(cli, &err)).ok()
}

fn report(cli: &Cli, error: &FetchError) {
    match cli.format {
        OutputFormat::Json => println!("{}", json::format_fetch_error(error)),
        OutputFormat::Pretty => eprintln!("{}", pretty::format_fetch_error(error)),
    }
}
