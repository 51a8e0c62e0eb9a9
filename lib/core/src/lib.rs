//! Core domain types for shelfseek.
//!
//! This crate provides the foundational types shared by every other crate:
//! validated content hashes and the ULID-backed request identifiers used for
//! log correlation.

pub mod hash;
pub mod id;

pub use hash::{ContentHash, ParseContentHashError};
pub use id::RequestId;
