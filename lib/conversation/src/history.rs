//! Conversation history.
//!
//! The history is owned by the host. Handlers only read a recent window of
//! it, rendered as plain `Role: content` lines for the extractor.

use crate::message::Message;

/// Number of trailing messages handed to the extractor by default.
pub const DEFAULT_CONTEXT_WINDOW: usize = 6;

/// An ordered, in-memory conversation.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Returns at most `window` of the most recent messages, oldest first.
    #[must_use]
    fn recent(&self, window: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// Renders the most recent `window` messages as `Role: content` lines.
    #[must_use]
    pub fn render_context(&self, window: usize) -> String {
        self.recent(window)
            .iter()
            .map(Message::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns whether the conversation has no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<Message> for Conversation {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}
