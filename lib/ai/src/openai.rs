//! OpenAI-compatible chat completions backend.
//!
//! Works against any server exposing `/v1/chat/completions` (OpenAI, Ollama,
//! vLLM, llama.cpp server).

use crate::backend::{LlmBackend, LlmBackendConfig, LlmRequest, LlmResponse, TokenUsage};
use crate::error::LlmError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use tracing::{debug, instrument, warn};

/// LLM backend speaking the OpenAI chat completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleBackend {
    client: reqwest::Client,
    config: LlmBackendConfig,
}

impl OpenAiCompatibleBackend {
    /// Creates a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(config: LlmBackendConfig) -> Result<Self, LlmError> {
        if config.base_url.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: "base_url is empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: format!("HTTP client error: {e}"),
            })?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Builds the chat completions request body.
fn chat_body(model: &str, request: &LlmRequest) -> JsonValue {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system {
        messages.push(json!({"role": "system", "content": system}));
    }
    messages.push(json!({"role": "user", "content": request.prompt}));

    let mut body = json!({
        "model": model,
        "messages": messages,
    });

    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }
    if request.json_mode {
        body["response_format"] = json!({"type": "json_object"});
    }

    body
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Parses a chat completions response body.
fn parse_chat_response(
    body: &str,
    fallback_model: &str,
    json_mode: bool,
) -> Result<LlmResponse, LlmError> {
    let completion: ChatCompletion =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParseFailed {
            reason: e.to_string(),
        })?;

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::ResponseParseFailed {
            reason: "response contained no message content".to_string(),
        })?;

    let json = if json_mode {
        serde_json::from_str(&content).ok()
    } else {
        None
    };

    let usage = completion
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let model = if completion.model.is_empty() {
        fallback_model.to_string()
    } else {
        completion.model
    };

    Ok(LlmResponse {
        content,
        json,
        usage,
        model,
    })
}

#[async_trait]
impl LlmBackend for OpenAiCompatibleBackend {
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = self.completions_url();
        let mut http_request = self
            .client
            .post(&url)
            .json(&chat_body(&self.config.model, request));

        if let Some(api_key) = &self.config.api_key
            && !api_key.is_empty()
        {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await.map_err(|e| {
            warn!(error = %e, endpoint = %url, "Failed to reach LLM endpoint");
            LlmError::RequestFailed {
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| LlmError::RequestFailed {
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(endpoint = %url, status = %status, body = %body, "LLM endpoint returned error");
            return Err(LlmError::ProviderError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parse_chat_response(&body, &self.config.model, request.json_mode)?;
        debug!(
            prompt_tokens = parsed.usage.prompt_tokens,
            completion_tokens = parsed.usage.completion_tokens,
            "LLM call completed"
        );
        Ok(parsed)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_includes_system_and_json_mode() {
        let request = LlmRequest::new("find dune")
            .with_system("extract")
            .with_temperature(0.0)
            .json_mode();

        let body = chat_body("llama3.2", &request);
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "find dune");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["temperature"], json!(0.0));
    }

    #[test]
    fn body_without_system_has_single_message() {
        let body = chat_body("m", &LlmRequest::new("hi"));
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn parses_structured_response() {
        let body = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "{\"searchTerm\": \"dune\"}"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5}
        }"#;

        let response = parse_chat_response(body, "fallback", true).expect("parse");
        assert_eq!(response.model, "gpt-4o-mini");
        assert_eq!(response.usage.total(), 17);
        assert_eq!(
            response.json,
            Some(json!({"searchTerm": "dune"}))
        );
    }

    #[test]
    fn falls_back_to_configured_model_name() {
        let body = r#"{"choices": [{"message": {"content": "plain"}}]}"#;
        let response = parse_chat_response(body, "fallback", false).expect("parse");
        assert_eq!(response.model, "fallback");
        assert!(response.json.is_none());
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[test]
    fn empty_choices_is_parse_failure() {
        let err = parse_chat_response(r#"{"choices": []}"#, "m", false).unwrap_err();
        assert!(matches!(err, LlmError::ResponseParseFailed { .. }));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = OpenAiCompatibleBackend::new(LlmBackendConfig::new(" ", "m")).unwrap_err();
        assert!(matches!(err, LlmError::InvalidConfig { .. }));
    }
}
