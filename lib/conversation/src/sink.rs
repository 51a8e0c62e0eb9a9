//! Reply delivery.
//!
//! Handlers never return text to the host directly; they push replies into
//! a [`ReplySink`] supplied by the host.

use crate::error::SinkError;
use async_trait::async_trait;
use rootcause::Report;
use std::sync::Mutex;

/// What a reply represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Progress notice sent before the answer is known.
    Status,
    /// The answer (or apology) for one handler invocation.
    Final,
}

/// A reply for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply kind.
    pub kind: ReplyKind,
    /// Formatted text.
    pub text: String,
}

impl Reply {
    /// Creates a status reply.
    #[must_use]
    pub fn status(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Status,
            text: text.into(),
        }
    }

    /// Creates a final reply.
    #[must_use]
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Final,
            text: text.into(),
        }
    }
}

/// Destination for replies, supplied by the host.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Delivers one reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot accept the reply.
    async fn deliver(&self, reply: Reply) -> Result<(), Report<SinkError>>;
}

/// A sink that keeps every reply in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    replies: Mutex<Vec<Reply>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the replies received so far, in delivery order.
    #[must_use]
    pub fn replies(&self) -> Vec<Reply> {
        self.replies
            .lock()
            .map(|replies| replies.clone())
            .unwrap_or_default()
    }

    /// Returns the text of the last final reply, if any.
    #[must_use]
    pub fn final_text(&self) -> Option<String> {
        self.replies()
            .into_iter()
            .rev()
            .find(|r| r.kind == ReplyKind::Final)
            .map(|r| r.text)
    }
}

#[async_trait]
impl ReplySink for MemorySink {
    async fn deliver(&self, reply: Reply) -> Result<(), Report<SinkError>> {
        let mut replies = self.replies.lock().map_err(|e| SinkError::DeliveryFailed {
            reason: e.to_string(),
        })?;
        replies.push(reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.deliver(Reply::status("working")).await.expect("deliver");
        sink.deliver(Reply::final_text("done")).await.expect("deliver");

        let replies = sink.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].kind, ReplyKind::Status);
        assert_eq!(sink.final_text().as_deref(), Some("done"));
    }

    #[test]
    fn empty_sink_has_no_final_text() {
        assert!(MemorySink::new().final_text().is_none());
    }
}
