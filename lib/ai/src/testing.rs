//! Deterministic stand-ins for the extraction capability.

use crate::error::ExtractionError;
use crate::extract::Extractor;
use crate::prompt::PromptTemplate;
use async_trait::async_trait;
use rootcause::Report;
use serde_json::Value as JsonValue;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An extractor that returns a fixed result and records every call.
#[derive(Debug)]
pub struct StubExtractor {
    reply: Result<JsonValue, ExtractionError>,
    calls: AtomicUsize,
    contexts: Mutex<Vec<(String, String)>>,
}

impl StubExtractor {
    /// Creates a stub that always returns `value`.
    #[must_use]
    pub fn returning(value: JsonValue) -> Self {
        Self::with_reply(Ok(value))
    }

    /// Creates a stub that always fails with `error`.
    #[must_use]
    pub fn failing(error: ExtractionError) -> Self {
        Self::with_reply(Err(error))
    }

    fn with_reply(reply: Result<JsonValue, ExtractionError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Returns how many times `extract` was called.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns `(template name, context)` for every call, in order.
    #[must_use]
    pub fn seen(&self) -> Vec<(String, String)> {
        self.contexts
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(
        &self,
        template: &PromptTemplate,
        context: &str,
    ) -> Result<JsonValue, Report<ExtractionError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.contexts.lock() {
            seen.push((template.name.to_string(), context.to_string()));
        }
        self.reply.clone().map_err(Report::from)
    }
}
