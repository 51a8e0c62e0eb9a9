//! Reply formatting.
//!
//! Pure functions from results to text. Missing optional fields drop out of
//! the output; nothing here can fail.

use crate::model::{BookRecord, DownloadLinkSet, SearchResult};
use std::fmt::Write as _;

/// Reply used when a search matched nothing.
pub const NO_RESULTS: &str =
    "I couldn't find any books matching that search. Try different search terms.";

/// Reply used when a book has no download links.
pub const NO_LINKS: &str = "No download links found for this book.";

const DOWNLOAD_HINT: &str =
    "To download one of these, ask me to download it or send me its MD5 hash.";

fn render_book(position: usize, book: &BookRecord) -> String {
    let title = if book.title.is_empty() {
        "Untitled"
    } else {
        book.title.as_str()
    };

    let mut entry = format!("{position}. {title}");
    if let Some(author) = &book.author {
        let _ = write!(entry, " by {author}");
    }

    let details: Vec<String> = [
        book.format.as_ref().map(|v| format!("Format: {v}")),
        book.size.as_ref().map(|v| format!("Size: {v}")),
        book.year.as_ref().map(|v| format!("Year: {v}")),
        book.genre.as_ref().map(|v| format!("Genre: {v}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !details.is_empty() {
        let _ = write!(entry, "\n   {}", details.join(" | "));
    }

    if let Some(hash) = &book.md5 {
        let _ = write!(entry, "\n   MD5: {hash}");
    }

    entry
}

/// Renders a search result.
#[must_use]
pub fn render_search_results(result: &SearchResult) -> String {
    if result.books.is_empty() {
        return NO_RESULTS.to_string();
    }

    let entries: Vec<String> = result
        .books
        .iter()
        .enumerate()
        .map(|(i, book)| render_book(i + 1, book))
        .collect();

    format!(
        "Found {} books. Here are the top {} results:\n\n{}\n\n{DOWNLOAD_HINT}",
        result.total,
        result.books.len(),
        entries.join("\n\n")
    )
}

/// Renders the download links for one book, numbered from 1.
#[must_use]
pub fn render_download_links(links: &DownloadLinkSet) -> String {
    if links.links.is_empty() {
        return NO_LINKS.to_string();
    }

    links
        .links
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{}. {url}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
