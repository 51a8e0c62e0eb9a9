//! Term extraction.
//!
//! The [`Extractor`] is the boundary to the external text-understanding
//! capability. It is treated as opaque and possibly nondeterministic: callers
//! check only that the fields they need are present and otherwise trust the
//! output verbatim. Nothing here retries.

use crate::backend::LlmBackend;
use crate::error::ExtractionError;
use crate::prompt::PromptTemplate;
use async_trait::async_trait;
use rootcause::Report;
use serde_json::{Map, Value as JsonValue, json};
use shelfseek_core::ContentHash;
use tracing::{debug, instrument, warn};

/// Capability that turns free text into a structured object.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Runs `template` over `context` and returns the extracted JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the capability fails or produces something other
    /// than a JSON object.
    async fn extract(
        &self,
        template: &PromptTemplate,
        context: &str,
    ) -> Result<JsonValue, Report<ExtractionError>>;
}

/// Template that reduces a user request to a search term.
#[must_use]
pub fn search_term_template() -> PromptTemplate {
    PromptTemplate::new(
        "search_term",
        "Extract the book search term from the request below. Keep the title, \
         author, subject or keywords the user is looking for and drop filler \
         such as \"find me\" or \"a book about\".\n\nRequest:\n{{context}}",
        "You turn book requests into search terms. Respond with exactly one \
         JSON object of the form {\"searchTerm\": string} and nothing else.",
        json!({
            "type": "object",
            "properties": {"searchTerm": {"type": "string"}},
            "required": ["searchTerm"]
        }),
    )
}

/// Template that picks the book a user wants to download from the conversation.
#[must_use]
pub fn book_identification_template() -> PromptTemplate {
    PromptTemplate::new(
        "book_identification",
        "Identify the book the user wants to download in the conversation \
         below. Use the MD5 hash listed next to that book in an earlier search \
         result.\n\nConversation:\n{{context}}",
        "You identify books. Respond with exactly one JSON object of the form \
         {\"md5\": string, \"title\": string, \"author\": string}. Leave out \
         \"md5\" when no listed book matches the request.",
        json!({
            "type": "object",
            "properties": {
                "md5": {"type": "string"},
                "title": {"type": "string"},
                "author": {"type": "string"}
            }
        }),
    )
}

fn as_object(value: &JsonValue) -> Result<&Map<String, JsonValue>, ExtractionError> {
    value.as_object().ok_or_else(|| ExtractionError::NotAnObject {
        output: value.to_string(),
    })
}

fn non_blank(object: &Map<String, JsonValue>, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extraction result for the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTermExtraction {
    /// The search term to send to the book index.
    pub search_term: String,
}

impl SearchTermExtraction {
    /// Reads `{ "searchTerm": string }` from an extracted object.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if `searchTerm` is absent, not a string, or blank.
    pub fn from_value(value: &JsonValue) -> Result<Self, ExtractionError> {
        let object = as_object(value)?;
        let search_term =
            non_blank(object, "searchTerm").ok_or_else(|| ExtractionError::MissingField {
                field: "searchTerm".to_string(),
            })?;
        Ok(Self { search_term })
    }
}

/// Extraction result for the download path.
///
/// Every field is optional here; the download resolver decides what a
/// missing hash means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookIdentification {
    /// Raw hash as returned by the extractor.
    pub md5: Option<String>,
    /// Book title.
    pub title: Option<String>,
    /// Book author.
    pub author: Option<String>,
}

impl BookIdentification {
    /// Reads `{ "md5", "title", "author" }` from an extracted object.
    ///
    /// # Errors
    ///
    /// Returns `NotAnObject` if the value is not a JSON object.
    pub fn from_value(value: &JsonValue) -> Result<Self, ExtractionError> {
        let object = as_object(value)?;
        Ok(Self {
            md5: non_blank(object, "md5"),
            title: non_blank(object, "title"),
            author: non_blank(object, "author"),
        })
    }

    /// Returns the extracted hash if it is a well-formed content hash.
    #[must_use]
    pub fn content_hash(&self) -> Option<ContentHash> {
        self.md5.as_deref().and_then(|md5| md5.parse().ok())
    }
}

/// Parses model text output as a JSON object, tolerating a fenced code block
/// or prose around the object.
fn parse_json_object(content: &str) -> Option<JsonValue> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    if let Ok(value) = serde_json::from_str::<JsonValue>(unfenced)
        && value.is_object()
    {
        return Some(value);
    }

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<JsonValue>(&unfenced[start..=end])
        .ok()
        .filter(JsonValue::is_object)
}

/// Extractor backed by a language model.
#[derive(Debug, Clone)]
pub struct LlmExtractor<B> {
    backend: B,
}

impl<B: LlmBackend> LlmExtractor<B> {
    /// Creates an extractor over the given backend.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: LlmBackend> Extractor for LlmExtractor<B> {
    #[instrument(skip(self, template, context), fields(template = %template.name, model = %self.backend.model()))]
    async fn extract(
        &self,
        template: &PromptTemplate,
        context: &str,
    ) -> Result<JsonValue, Report<ExtractionError>> {
        let request = template.to_request(context);

        let response = self.backend.generate(&request).await.map_err(|e| {
            warn!(error = %e, "Extraction backend call failed");
            ExtractionError::Backend {
                reason: e.to_string(),
            }
        })?;

        let value = match response.json {
            Some(value) if value.is_object() => value,
            _ => parse_json_object(&response.content).ok_or_else(|| {
                ExtractionError::NotAnObject {
                    output: response.content.clone(),
                }
            })?,
        };

        if let Some(field) = template
            .required_fields()
            .into_iter()
            .find(|field| value.get(*field).is_none_or(JsonValue::is_null))
        {
            warn!(field, output = %value, "Extraction result lacks a required field");
            return Err(ExtractionError::MissingField {
                field: field.to_string(),
            }
            .into());
        }

        debug!(
            output = %value,
            model = %response.model,
            tokens = response.usage.total(),
            "Extraction completed"
        );
        Ok(value)
    }
}
