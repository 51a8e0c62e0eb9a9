//! Conversation primitives for shelfseek.
//!
//! This crate provides:
//!
//! - **Messages**: the turns of a conversation
//! - **Conversation**: the host-owned history the download path reads from
//! - **Reply sink**: the host-supplied destination for formatted replies

pub mod error;
pub mod history;
pub mod message;
pub mod sink;

pub use error::SinkError;
pub use history::{Conversation, DEFAULT_CONTEXT_WINDOW};
pub use message::{Message, MessageRole};
pub use sink::{MemorySink, Reply, ReplyKind, ReplySink};
