//! Core types and traits for the document QA pipeline
//!
//! This crate provides foundational types used across all other crates:
//! - Retrieval data model (`Passage`, `Citation`)
//! - Response payloads (`QaResult`, `ChatTurn`, `QaErrorResponse`)
//! - Capability traits for pluggable backends (`ChatModel`,
//!   `TextEmbedder`, `PassageRetriever`)
//! - Error types

pub mod error;
pub mod passage;
pub mod qa;
pub mod traits;

pub use error::{Error, Result};
pub use passage::{Citation, Passage};
pub use qa::{ChatTurn, QaErrorResponse, QaResult, TurnRole};
pub use traits::{ChatModel, PassageRetriever, TextEmbedder};
