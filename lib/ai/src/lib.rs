//! Language-model primitives for shelfseek.
//!
//! This crate provides:
//!
//! - **LLM backend**: a provider-neutral request/response interface plus an
//!   OpenAI-compatible HTTP implementation
//! - **Prompts**: fixed extraction instructions with a JSON output schema
//! - **Extractor**: the opaque capability that turns free text into a
//!   structured field set using a fixed extraction template

pub mod backend;
pub mod error;
pub mod extract;
pub mod openai;
pub mod prompt;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{LlmBackend, LlmBackendConfig, LlmRequest, LlmResponse, TokenUsage};
pub use error::{ExtractionError, LlmError};
pub use extract::{
    BookIdentification, Extractor, LlmExtractor, SearchTermExtraction,
    book_identification_template, search_term_template,
};
pub use openai::OpenAiCompatibleBackend;
pub use prompt::{CONTEXT_PLACEHOLDER, PromptTemplate};
