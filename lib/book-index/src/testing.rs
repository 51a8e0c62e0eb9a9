//! Deterministic stand-in for the HTTP transport.

use crate::error::TransportError;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};
use async_trait::async_trait;
use std::sync::Mutex;

/// A transport that answers every request with the same canned outcome and
/// records what it was asked.
#[derive(Debug)]
pub struct StubTransport {
    reply: Result<ApiResponse, TransportError>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    /// Answers with `status` and a JSON (or any text) `body`.
    #[must_use]
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::with_response(ApiResponse::new(status, body))
    }

    /// Answers with the given response.
    #[must_use]
    pub fn with_response(response: ApiResponse) -> Self {
        Self {
            reply: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request at the transport level.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(TransportError::new(reason)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Returns how many requests were received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.reply.clone()
    }
}
