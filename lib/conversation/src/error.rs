//! Error types for the conversation crate.

use std::fmt;

/// Errors from delivering a reply to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The host could not accept the reply.
    DeliveryFailed { reason: String },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeliveryFailed { reason } => {
                write!(f, "failed to deliver reply: {reason}")
            }
        }
    }
}

impl std::error::Error for SinkError {}
