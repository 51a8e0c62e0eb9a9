//! Error types for the book index crate.
//!
//! - `TransportError`: the HTTP seam could not complete an exchange
//! - `BookIndexError`: everything a resolver can fail with

use serde_json::Value as JsonValue;
use std::fmt;

/// Errors from the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// What went wrong.
    pub reason: String,
}

impl TransportError {
    /// Creates a transport error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP transport failed: {}", self.reason)
    }
}

impl std::error::Error for TransportError {}

/// Errors from the search and download resolvers.
#[derive(Debug, Clone, PartialEq)]
pub enum BookIndexError {
    /// Required configuration is missing or unusable.
    Configuration { reason: String },
    /// The request violates a precondition (e.g. blank query).
    InvalidRequest { reason: String },
    /// The HTTP exchange did not complete.
    RequestFailed { endpoint: String, reason: String },
    /// The response body was not valid JSON or had an unexpected shape.
    ResponseParse {
        endpoint: String,
        reason: String,
        body: String,
    },
    /// The service answered with a non-success status.
    Api {
        endpoint: String,
        status: u16,
        body: JsonValue,
    },
    /// No content hash could be resolved for a download.
    IdentifierNotFound,
    /// The extractor failed or returned an incomplete object.
    ExtractionFailed { reason: String },
}

impl fmt::Display for BookIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => {
                write!(f, "book index is not configured: {reason}")
            }
            Self::InvalidRequest { reason } => {
                write!(f, "invalid book index request: {reason}")
            }
            Self::RequestFailed { endpoint, reason } => {
                write!(f, "request to '{endpoint}' failed: {reason}")
            }
            Self::ResponseParse {
                endpoint, reason, ..
            } => {
                write!(f, "failed to parse '{endpoint}' response: {reason}")
            }
            Self::Api {
                endpoint, status, ..
            } => {
                write!(f, "'{endpoint}' returned HTTP {status}")
            }
            Self::IdentifierNotFound => {
                write!(f, "could not determine which book to download")
            }
            Self::ExtractionFailed { reason } => {
                write!(f, "term extraction failed: {reason}")
            }
        }
    }
}

impl std::error::Error for BookIndexError {}
