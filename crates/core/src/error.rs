//! Workspace-wide error type
//!
//! Crate-local errors (`RetrievalError`, `LlmError`) convert into this
//! type at crate boundaries.

use thiserror::Error;

/// Top-level error for the QA pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;
