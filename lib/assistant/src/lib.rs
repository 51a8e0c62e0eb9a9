//! Handler boundary for shelfseek.
//!
//! This crate provides:
//!
//! - **Intent**: routing an inbound message to the search or download path
//! - **Handlers**: one async entry point per path that never fails; every
//!   error is logged and turned into a short apology for the user
//! - **Replies**: the mapping from book index errors to user-facing text

pub mod handler;
pub mod intent;
pub mod reply;

pub use handler::BookAssistant;
pub use intent::Intent;
pub use reply::{Operation, apology};
