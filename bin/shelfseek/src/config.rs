//! Host configuration.
//!
//! Loaded once at startup via the `config` crate from environment variables,
//! with `__` separating nested keys:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BOOK_INDEX__API_KEY` | unset (requests fail with a configuration error) |
//! | `BOOK_INDEX__HOST` | `annas-archive-api.p.rapidapi.com` |
//! | `LLM__BASE_URL` | `http://localhost:11434` |
//! | `LLM__MODEL` | `llama3.2` |
//! | `LLM__API_KEY` | unset |
//! | `HISTORY_WINDOW` | `6` |

use serde::Deserialize;
use shelfseek_ai::LlmBackendConfig;
use shelfseek_book_index::BookIndexConfig;
use shelfseek_conversation::DEFAULT_CONTEXT_WINDOW;

/// Host configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct AssistantConfig {
    /// Book index service.
    #[serde(default)]
    pub book_index: BookIndexConfig,

    /// Language model used for extraction.
    #[serde(default)]
    pub llm: LlmBackendConfig,

    /// Past messages shown to the extractor on the download path.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_history_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

impl AssistantConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::default())
    }

    fn from_source(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
