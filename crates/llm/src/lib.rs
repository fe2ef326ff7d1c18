//! LLM integration for the QA pipeline
//!
//! Features:
//! - OpenAI-compatible chat backend (OpenAI, Azure OpenAI, local servers)
//! - Remote embedding client for the same API family
//! - Retry with exponential backoff for transient failures
//! - Per-call temperature control (generation vs. judging)

pub mod backend;
pub mod embeddings;
pub mod prompt;

pub use backend::{OpenAiBackend, OpenAiConfig};
pub use embeddings::{EmbeddingClient, EmbeddingClientConfig};
pub use prompt::{Message, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for docqa_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(msg) => docqa_core::Error::Config(msg),
            other => docqa_core::Error::Llm(other.to_string()),
        }
    }
}
