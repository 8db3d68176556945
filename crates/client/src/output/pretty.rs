//! Pretty output formatting.

use chrono::{DateTime, Utc};
use eventboard_core::event::{Event, EventId, Rejection, MAX_SELECTED_EVENTS};
use eventboard_core::repository::{FetchError, Pager};
use eventboard_core::{EventListing, ListingError, ListingRow};

/// Headline printed above any fetch error.
pub const ERROR_HEADLINE: &str = "Oops! Something went wrong.";

/// Format an event time, e.g. "December 17, 2022 1:00 PM".
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%B %-d, %Y %-I:%M %p").to_string()
}

/// Format an event for display.
pub fn format_event(event: &Event) -> String {
    format!(
        "{} ({})\n  ID: {}\n  From: {}\n  To: {}",
        event.name(),
        event.category(),
        event.id(),
        format_time(event.start_time()),
        format_time(event.end_time())
    )
}

/// Format one listing row, marking its select control state.
pub fn format_row(row: &ListingRow<'_>) -> String {
    let marker = if row.selected {
        "[x]"
    } else if row.selectable {
        "[ ]"
    } else {
        "[-]"
    };
    match row.conflicts_with {
        Some(other) => format!(
            "{} {}\n  Time conflict with {}",
            marker,
            format_event(row.event),
            other.name()
        ),
        None => format!("{} {}\n  {}", marker, format_event(row.event), row.tooltip),
    }
}

/// Format the visible rows of a listing.
pub fn format_rows(rows: &[ListingRow<'_>], pager: &Pager) -> String {
    if rows.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({})", rows.len());
    if pager.total_pages() > 1 {
        output.push_str(&format!(
            " - page {} of {}",
            pager.page(),
            pager.total_pages()
        ));
    }
    output.push('\n');
    output.push_str(&"-".repeat(40));
    for row in rows {
        output.push_str(&format!("\n{}", format_row(row)));
        output.push('\n');
    }
    output
}

/// Format the category picker options.
pub fn format_categories(categories: &[&str]) -> String {
    let mut output = String::from("All Categories");
    for category in categories {
        output.push('\n');
        output.push_str(category);
    }
    output
}

/// Format the selection grouped by category.
pub fn format_selection(listing: &EventListing) -> String {
    let selection = listing.selection();
    if selection.is_empty() {
        return "No events selected.".to_string();
    }
    let mut output = format!(
        "SELECTED EVENTS ({}/{}, {} remaining)\n",
        selection.len(),
        MAX_SELECTED_EVENTS,
        selection.remaining()
    );
    output.push_str(&"-".repeat(40));
    for group in listing.selected_by_category() {
        output.push_str(&format!("\n{}", group.category));
        for event in &group.events {
            output.push_str(&format!(
                "\n  {}: {} - {}",
                event.name(),
                format_time(event.start_time()),
                format_time(event.end_time())
            ));
        }
        output.push('\n');
    }
    output
}

/// Format the outcome of one select attempt against the listing it ran on.
pub fn format_select_outcome(
    listing: &EventListing,
    id: EventId,
    outcome: Result<Option<Rejection>, ListingError>,
) -> String {
    let event = listing.catalog().find(id);
    match (outcome, event) {
        (Err(err), _) => format!("Skipped {}: {}", id, err),
        (Ok(None), Some(event)) => format!("Selected {} ({})", event.name(), id),
        (Ok(None), None) => format!("Selected {}", id),
        (Ok(Some(Rejection::TimeConflict)), Some(event)) => match listing.conflict_with(event) {
            Some(other) => format!("Skipped {}: Time conflict with {}", id, other.name()),
            None => format!("Skipped {}: {}", id, Rejection::TimeConflict.tooltip()),
        },
        (Ok(Some(rejection)), _) => format!("Skipped {}: {}", id, rejection.tooltip()),
    }
}

/// Format a fetch error for display.
pub fn format_fetch_error(error: &FetchError) -> String {
    format!("{}\n{}", ERROR_HEADLINE, error.message())
}
