//! Book index service configuration.
//!
//! Loaded once at process start and never mutated. The credential is
//! validated lazily: a missing key only becomes an error when a resolver
//! needs it.

use crate::error::BookIndexError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the external book index service.
#[derive(Clone, Serialize, Deserialize)]
pub struct BookIndexConfig {
    /// API key sent in the `x-rapidapi-key` header.
    #[serde(default)]
    api_key: Option<String>,
    /// Service host, also sent in the `x-rapidapi-host` header.
    /// Default: "annas-archive-api.p.rapidapi.com"
    #[serde(default = "default_host")]
    host: String,
}

fn default_host() -> String {
    "annas-archive-api.p.rapidapi.com".to_string()
}

impl BookIndexConfig {
    /// Creates a configuration for the default host.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            host: default_host(),
        }
    }

    /// Overrides the service host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Returns the API key.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if no key is set or the key is blank.
    pub fn api_key(&self) -> Result<&str, BookIndexError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| BookIndexError::Configuration {
                reason: "API key is not set".to_string(),
            })
    }

    /// Returns the service host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the base URL all endpoints hang off.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host.trim_end_matches('/'))
    }
}

impl Default for BookIndexConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for BookIndexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookIndexConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_configuration_error() {
        let err = BookIndexConfig::default().api_key().unwrap_err();
        assert!(matches!(err, BookIndexError::Configuration { .. }));
    }

    #[test]
    fn blank_key_is_configuration_error() {
        let config = BookIndexConfig::new(Some("   ".to_string()));
        assert!(config.api_key().is_err());
    }

    #[test]
    fn key_and_host_are_exposed() {
        let config = BookIndexConfig::new(Some("k3y".to_string())).with_host("books.example");
        assert_eq!(config.api_key().expect("key"), "k3y");
        assert_eq!(config.base_url(), "https://books.example");
    }

    #[test]
    fn defaults_apply_on_deserialize() {
        let config: BookIndexConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config.host(), "annas-archive-api.p.rapidapi.com");
        assert!(config.api_key().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let config = BookIndexConfig::new(Some("super-secret".to_string()));
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
