//! Shared request pipeline for the book index endpoints.
//!
//! Every endpoint call follows the same discipline: check the credential,
//! build the URL, send one GET, read the body as text, parse it as JSON,
//! then look at the status, then map the JSON onto the expected shape.

use crate::config::BookIndexConfig;
use crate::error::BookIndexError;
use crate::transport::{ApiRequest, HttpTransport};
use reqwest::Url;
use rootcause::Report;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

/// Header carrying the service host.
pub const HOST_HEADER: &str = "x-rapidapi-host";
/// Header carrying the API key.
pub const KEY_HEADER: &str = "x-rapidapi-key";

/// Client for the book index service.
#[derive(Clone)]
pub struct BookIndexClient {
    config: Arc<BookIndexConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl BookIndexClient {
    /// Creates a client.
    #[must_use]
    pub fn new(config: BookIndexConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BookIndexConfig {
        &self.config
    }

    /// Fails fast if the credential is missing.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if no API key is configured.
    pub fn ensure_configured(&self) -> Result<(), Report<BookIndexError>> {
        self.config.api_key()?;
        Ok(())
    }

    /// Builds the URL for `endpoint` with form-encoded query parameters.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the configured host does not form a valid URL.
    pub fn endpoint_url(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, BookIndexError> {
        let base = format!("{}/{endpoint}", self.config.base_url());
        Url::parse_with_params(&base, params).map_err(|e| BookIndexError::Configuration {
            reason: format!("invalid host '{}': {e}", self.config.host()),
        })
    }

    /// Performs one GET against `endpoint` and decodes the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the credential is missing (no request is sent)
    /// - `RequestFailed` if the exchange did not complete
    /// - `ResponseParse` if the body is not JSON or does not match `T`
    /// - `Api` if the status is not 2xx
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Report<BookIndexError>> {
        let api_key = self.config.api_key()?;
        let url = self.endpoint_url(endpoint, params)?;
        let request = ApiRequest::get(url)
            .with_header(HOST_HEADER, self.config.host())
            .with_header(KEY_HEADER, api_key);

        debug!(endpoint, url = %request.url, "Sending book index request");

        let response = self.transport.get(&request).await.map_err(|e| {
            warn!(endpoint, error = %e, "Book index request failed");
            BookIndexError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: e.reason,
            }
        })?;

        let value: JsonValue = serde_json::from_str(&response.body).map_err(|e| {
            warn!(
                endpoint,
                status = response.status,
                body = %response.body,
                error = %e,
                "Book index returned a body that is not JSON"
            );
            BookIndexError::ResponseParse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
                body: response.body.clone(),
            }
        })?;

        if !response.is_success() {
            warn!(
                endpoint,
                status = response.status,
                body = %value,
                "Book index returned error status"
            );
            return Err(BookIndexError::Api {
                endpoint: endpoint.to_string(),
                status: response.status,
                body: value,
            }
            .into());
        }

        serde_json::from_value(value).map_err(|e| {
            warn!(
                endpoint,
                body = %response.body,
                error = %e,
                "Book index response has an unexpected shape"
            );
            BookIndexError::ResponseParse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
                body: response.body.clone(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use crate::transport::ApiResponse;

    fn client(transport: Arc<StubTransport>) -> BookIndexClient {
        BookIndexClient::new(
            BookIndexConfig::new(Some("k3y".to_string())).with_host("books.example"),
            transport,
        )
    }

    #[test]
    fn endpoint_url_form_encodes_params() {
        let transport = Arc::new(StubTransport::json(200, "[]"));
        let url = client(transport)
            .endpoint_url("search", &[("q", "war & peace"), ("limit", "10")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://books.example/search?q=war+%26+peace&limit=10"
        );
    }

    #[tokio::test]
    async fn sends_auth_headers() {
        let transport = Arc::new(StubTransport::json(200, "[]"));
        let _: Vec<String> = client(transport.clone())
            .get_json("download", &[("md5", "abc")])
            .await
            .expect("ok");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header(HOST_HEADER), Some("books.example"));
        assert_eq!(requests[0].header(KEY_HEADER), Some("k3y"));
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error_even_on_error_status() {
        let transport = Arc::new(StubTransport::with_response(ApiResponse::new(
            502,
            "<html>Bad Gateway</html>",
        )));
        let report = client(transport)
            .get_json::<JsonValue>("search", &[])
            .await
            .unwrap_err();
        match report.current_context() {
            BookIndexError::ResponseParse { body, .. } => {
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("expected ResponseParse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_carries_parsed_body() {
        let transport = Arc::new(StubTransport::json(403, r#"{"message":"forbidden"}"#));
        let report = client(transport)
            .get_json::<JsonValue>("search", &[])
            .await
            .unwrap_err();
        match report.current_context() {
            BookIndexError::Api { status, body, .. } => {
                assert_eq!(*status, 403);
                assert_eq!(body["message"], "forbidden");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_request_failed() {
        let transport = Arc::new(StubTransport::failing("connection reset"));
        let report = client(transport)
            .get_json::<JsonValue>("search", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            BookIndexError::RequestFailed { .. }
        ));
    }

    #[tokio::test]
    async fn missing_key_sends_nothing() {
        let transport = Arc::new(StubTransport::json(200, "[]"));
        let client = BookIndexClient::new(BookIndexConfig::default(), transport.clone());
        let report = client
            .get_json::<JsonValue>("search", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            BookIndexError::Configuration { .. }
        ));
        assert_eq!(transport.calls(), 0);
    }
}
