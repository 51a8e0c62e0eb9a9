//! Error types for the AI crate.
//!
//! - `LlmError`: Low-level LLM backend operations
//! - `ExtractionError`: Turning backend output into a structured field set

use std::fmt;

/// Errors from LLM backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Request could not be sent or the response body could not be read.
    RequestFailed { reason: String },
    /// The provider answered with a non-success status.
    ProviderError { status: u16, body: String },
    /// Response parsing failed.
    ResponseParseFailed { reason: String },
    /// Invalid configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => {
                write!(f, "LLM request failed: {reason}")
            }
            Self::ProviderError { status, body } => {
                write!(f, "LLM provider returned HTTP {status}: {body}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse LLM response: {reason}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid LLM configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// Errors from term extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The extracted object lacks a required field.
    MissingField { field: String },
    /// The extractor produced something other than a JSON object.
    NotAnObject { output: String },
    /// The underlying text-understanding capability failed.
    Backend { reason: String },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "extraction result is missing required field '{field}'")
            }
            Self::NotAnObject { output } => {
                write!(f, "extraction result is not a JSON object: {output}")
            }
            Self::Backend { reason } => {
                write!(f, "extraction backend failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ExtractionError {}
