//! LLM backend abstraction.
//!
//! Provides a provider-neutral interface so extraction never depends on a
//! particular model host.

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Configuration for an OpenAI-compatible LLM backend.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmBackendConfig {
    /// Base URL for the API, without the `/v1` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key, sent as a bearer token when present.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

impl LlmBackendConfig {
    /// Creates a configuration for the given endpoint and model.
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
        }
    }
}

impl Default for LlmBackendConfig {
    fn default() -> Self {
        Self::new(default_base_url(), default_model())
    }
}
// Keeps the key out of logs.
impl fmt::Debug for LlmBackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmBackendConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One completion request: an optional system message and one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub system: Option<String>,
    pub prompt: String,
    /// Sampling temperature; the provider default applies when unset.
    pub temperature: Option<f32>,
    /// Ask the provider to constrain output to a single JSON object.
    pub json_mode: bool,
}

impl LlmRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: None,
            json_mode: false,
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// What the model answered.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Raw message text.
    pub content: String,
    /// `content` parsed as JSON, for JSON-mode requests whose text parsed.
    pub json: Option<JsonValue>,
    pub usage: TokenUsage,
    /// Model name reported by the provider, or the configured one.
    pub model: String,
}

/// Token counts reported by the provider. Zero when it reports none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// A language model host.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Runs one completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached, answers with a
    /// non-success status, or returns a body that cannot be read.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Configured model name, for logs.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_free_text() {
        let request = LlmRequest::new("Find the book");
        assert_eq!(request.prompt, "Find the book");
        assert!(request.system.is_none());
        assert!(request.temperature.is_none());
        assert!(!request.json_mode);

        let request = request.with_system("extract").with_temperature(0.2).json_mode();
        assert_eq!(request.system.as_deref(), Some("extract"));
        assert_eq!(request.temperature, Some(0.2));
        assert!(request.json_mode);
    }

    #[test]
    fn usage_total_saturates() {
        let usage = TokenUsage {
            prompt_tokens: u32::MAX,
            completion_tokens: 1,
        };
        assert_eq!(usage.total(), u32::MAX);
    }

    #[test]
    fn config_defaults_apply_when_fields_missing() {
        let config: LlmBackendConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = LlmBackendConfig {
            api_key: Some("sk-secret".to_string()),
            ..LlmBackendConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
