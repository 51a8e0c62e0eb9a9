//! HTTP transport.
//!
//! Resolvers never talk to reqwest directly; they hand a fully built
//! [`ApiRequest`] to an [`HttpTransport`] and get the status and raw body
//! back. The body is always returned as text so callers can log it when it
//! fails to parse.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Url;
use std::fmt;

/// Header names whose values never appear in `Debug` output.
const SECRET_HEADERS: &[&str] = &["x-rapidapi-key"];

/// A GET request against the book index.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Fully qualified URL including the query string.
    pub url: Url,
    /// Request headers, in insertion order.
    pub headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    /// Creates a GET request for `url`.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Returns the value of the first header named `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if SECRET_HEADERS.contains(name) {
                    (*name, "<redacted>")
                } else {
                    (*name, value.as_str())
                }
            })
            .collect();
        f.debug_struct("ApiRequest")
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .finish()
    }
}

/// The raw outcome of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Full response body as text.
    pub body: String,
}

impl ApiResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for sending requests to the book index.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one GET request and reads the whole body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or the body could
    /// not be read. Non-success statuses are not errors at this layer.
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Transport backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh client.
    ///
    /// No timeout is set; a host that needs a deadline drops the future.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::new(format!("HTTP client error: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self.client.get(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("failed to read body: {e}")))?;

        Ok(ApiResponse { status, body })
    }
}
