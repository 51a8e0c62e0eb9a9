//! Keyword search against the book index.

use crate::client::BookIndexClient;
use crate::error::BookIndexError;
use crate::model::{SearchResponse, SearchResult};
use rootcause::Report;
use shelfseek_ai::{Extractor, SearchTermExtraction, search_term_template};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Path of the search endpoint.
pub const SEARCH_ENDPOINT: &str = "search";
/// Maximum number of books requested and returned.
pub const SEARCH_LIMIT: usize = 10;
/// Sort order requested from the service.
pub const SEARCH_SORT: &str = "mostRelevant";

/// Resolves free text or a search term into ranked book records.
#[derive(Clone)]
pub struct SearchResolver {
    client: BookIndexClient,
    extractor: Arc<dyn Extractor>,
}

impl SearchResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(client: BookIndexClient, extractor: Arc<dyn Extractor>) -> Self {
        Self { client, extractor }
    }

    /// Asks the extractor for a search term.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionFailed` if the extractor fails or omits `searchTerm`.
    #[instrument(skip(self, text))]
    pub async fn extract_term(&self, text: &str) -> Result<String, Report<BookIndexError>> {
        let value = self
            .extractor
            .extract(&search_term_template(), text)
            .await
            .map_err(|report| {
                warn!(error = %report, "Search term extraction failed");
                BookIndexError::ExtractionFailed {
                    reason: report.current_context().to_string(),
                }
            })?;

        let extraction = SearchTermExtraction::from_value(&value).map_err(|e| {
            warn!(error = %e, output = %value, "Extractor returned no search term");
            BookIndexError::ExtractionFailed {
                reason: e.to_string(),
            }
        })?;

        Ok(extraction.search_term)
    }

    /// Searches the index for `query`.
    ///
    /// Books come back in the service's order, at most [`SEARCH_LIMIT`] of them.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no API key is set (no request is sent)
    /// - `InvalidRequest` if `query` is blank
    /// - `RequestFailed`, `ResponseParse` or `Api` from the exchange
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchResult, Report<BookIndexError>> {
        self.client.ensure_configured()?;

        let query = query.trim();
        if query.is_empty() {
            return Err(BookIndexError::InvalidRequest {
                reason: "search query is empty".to_string(),
            }
            .into());
        }

        let limit = SEARCH_LIMIT.to_string();
        let response: SearchResponse = self
            .client
            .get_json(
                SEARCH_ENDPOINT,
                &[("q", query), ("limit", &limit), ("sort", SEARCH_SORT)],
            )
            .await?;

        let result = response.into_result(SEARCH_LIMIT);
        info!(
            total = result.total,
            book_count = result.books.len(),
            "Search completed"
        );
        Ok(result)
    }

    /// Extracts a search term from `text` and searches for it.
    ///
    /// Returns the term alongside the result so callers can log or echo it.
    ///
    /// # Errors
    ///
    /// As [`Self::extract_term`] and [`Self::search`]. A missing API key is
    /// reported before the extractor is consulted.
    pub async fn search_text(
        &self,
        text: &str,
    ) -> Result<(String, SearchResult), Report<BookIndexError>> {
        self.client.ensure_configured()?;
        let term = self.extract_term(text).await?;
        info!(term = %term, "Extracted search term");
        let result = self.search(&term).await?;
        Ok((term, result))
    }
}
