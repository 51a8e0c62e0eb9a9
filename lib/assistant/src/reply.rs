//! User-facing text for failures.
//!
//! Configuration problems are the one kind the user can act on, so they are
//! shown as-is. Everything else gets a short apology; the detail goes to the
//! log.

use shelfseek_book_index::BookIndexError;

/// Apology for a failed search.
pub const SEARCH_TROUBLE: &str =
    "Sorry, I had trouble searching for books just now. Please try again in a moment.";

/// Apology for a failed download lookup.
pub const DOWNLOAD_TROUBLE: &str =
    "Sorry, I had trouble getting the download links for that book. Please try again in a moment.";

/// The operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Download,
}

/// Converts a failure into the reply the user sees.
#[must_use]
pub fn apology(operation: Operation, error: &BookIndexError) -> String {
    match (error, operation) {
        (BookIndexError::Configuration { .. }, _) => error.to_string(),
        (_, Operation::Search) => SEARCH_TROUBLE.to_string(),
        (_, Operation::Download) => DOWNLOAD_TROUBLE.to_string(),
    }
}
