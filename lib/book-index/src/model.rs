//! Book index data model.
//!
//! Wire decoding is lenient: missing, null and empty optional fields all mean
//! "absent", and a record whose `md5` is not a well-formed content hash is
//! kept without one.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use shelfseek_core::ContentHash;
use tracing::warn;

/// One book file in the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Book title.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    /// Author, if known.
    #[serde(default, deserialize_with = "optional_text")]
    pub author: Option<String>,
    /// Content hash identifying this specific file.
    #[serde(default, deserialize_with = "optional_hash")]
    pub md5: Option<ContentHash>,
    /// Cover image URL.
    #[serde(default, deserialize_with = "optional_text")]
    pub img_url: Option<String>,
    /// Human-formatted file size (e.g. "1.2MB").
    #[serde(default, deserialize_with = "optional_text")]
    pub size: Option<String>,
    /// Genre.
    #[serde(default, deserialize_with = "optional_text")]
    pub genre: Option<String>,
    /// File format (e.g. "pdf", "epub").
    #[serde(default, deserialize_with = "optional_text")]
    pub format: Option<String>,
    /// Publication year.
    #[serde(default, deserialize_with = "optional_text")]
    pub year: Option<String>,
    /// Mirrors/sources listing this file, in service order.
    #[serde(default, deserialize_with = "string_list")]
    pub sources: Vec<String>,
    /// Fallback cover color.
    #[serde(default, deserialize_with = "optional_text")]
    pub fallback_color: Option<String>,
}

/// Result of a keyword search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Total number of matches the service reports.
    pub total: u64,
    /// Matches in the service's relevance order.
    pub books: Vec<BookRecord>,
}

impl SearchResult {
    /// Returns true if there are no books to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Wire shape of the search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    books: Vec<BookRecord>,
}

impl SearchResponse {
    /// Converts to a result holding at most `limit` books.
    ///
    /// Surplus books are dropped from the tail; order is never changed. A
    /// missing total falls back to the number of books returned.
    pub(crate) fn into_result(self, limit: usize) -> SearchResult {
        let total = self.total.unwrap_or(self.books.len() as u64);
        let mut books = self.books;
        books.truncate(limit);
        SearchResult { total, books }
    }
}

/// Download links for one content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLinkSet {
    /// The hash the links belong to.
    pub hash: ContentHash,
    /// URLs in the service's order.
    pub links: Vec<String>,
}

impl DownloadLinkSet {
    /// Returns true if the service returned no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn scalar_text(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<JsonValue>::deserialize(deserializer)?.and_then(scalar_text))
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_hash<'de, D>(deserializer: D) -> Result<Option<ContentHash>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<JsonValue>::deserialize(deserializer)?.and_then(scalar_text) else {
        return Ok(None);
    };
    match raw.parse::<ContentHash>() {
        Ok(hash) => Ok(Some(hash)),
        Err(e) => {
            warn!(md5 = %raw, error = %e, "Ignoring malformed content hash in book record");
            Ok(None)
        }
    }
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<JsonValue>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.into_iter().filter_map(scalar_text).collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HASH: &str = "5b723c172fc4c8a77f476e7016ad3945";

    #[test]
    fn decodes_full_record() {
        let record: BookRecord = serde_json::from_value(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "md5": HASH,
            "imgUrl": "https://img.example/dune.jpg",
            "size": "1.2MB",
            "genre": "Science Fiction",
            "format": "epub",
            "year": "1965",
            "sources": ["libgen", "zlib"],
            "fallbackColor": "#aabbcc"
        }))
        .expect("decode");

        assert_eq!(record.title, "Dune");
        assert_eq!(record.md5.as_ref().map(ContentHash::as_str), Some(HASH));
        assert_eq!(record.img_url.as_deref(), Some("https://img.example/dune.jpg"));
        assert_eq!(record.sources, vec!["libgen", "zlib"]);
        assert_eq!(record.fallback_color.as_deref(), Some("#aabbcc"));
    }

    #[test]
    fn optional_fields_tolerate_null_empty_and_numbers() {
        let record: BookRecord = serde_json::from_value(json!({
            "title": "Untitled notes",
            "author": "",
            "md5": null,
            "year": 1999,
            "genre": null,
            "sources": null
        }))
        .expect("decode");

        assert!(record.author.is_none());
        assert!(record.md5.is_none());
        assert!(record.genre.is_none());
        assert_eq!(record.year.as_deref(), Some("1999"));
        assert!(record.sources.is_empty());
    }

    #[test]
    fn malformed_hash_drops_only_that_hash() {
        let response: SearchResponse = serde_json::from_value(json!({
            "total": 3,
            "books": [
                {"title": "Good", "md5": HASH},
                {"title": "Upper", "md5": "5B723C172FC4C8A77F476E7016AD3945"},
                {"title": "Short", "md5": "5b723c172fc4c8a77f476e7016ad394"}
            ]
        }))
        .expect("decode");

        let result = response.into_result(10);
        assert_eq!(result.books.len(), 3);
        assert_eq!(result.books[0].md5.as_ref().map(ContentHash::as_str), Some(HASH));
        assert_eq!(result.books[1].title, "Upper");
        assert!(result.books[1].md5.is_none());
        assert!(result.books[2].md5.is_none());
    }

    #[test]
    fn search_response_keeps_order_and_truncates_tail() {
        let books: Vec<JsonValue> = (0..12).map(|i| json!({"title": format!("B{i}")})).collect();
        let response: SearchResponse =
            serde_json::from_value(json!({"total": 340, "books": books})).expect("decode");

        let result = response.into_result(10);
        assert_eq!(result.total, 340);
        assert_eq!(result.books.len(), 10);
        assert_eq!(result.books[0].title, "B0");
        assert_eq!(result.books[9].title, "B9");
    }

    #[test]
    fn search_response_without_books_is_empty() {
        let response: SearchResponse =
            serde_json::from_value(json!({"total": 0, "books": null})).expect("decode");
        let result = response.into_result(10);
        assert!(result.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn missing_total_falls_back_to_book_count() {
        let response: SearchResponse =
            serde_json::from_value(json!({"books": [{"title": "A"}]})).expect("decode");
        assert_eq!(response.into_result(10).total, 1);
    }
}
