//! Hybrid retrieval for the document QA pipeline
//!
//! Features:
//! - Lexical BM25 search via Tantivy
//! - Semantic vector search via Qdrant with candidate-pool control
//! - Reciprocal Rank Fusion of both result lists
//! - Concurrent adapter execution with over-fetch before fusion

pub mod fusion;
pub mod lexical;
pub mod retriever;
pub mod vector_store;

pub use fusion::{fuse, FusionConfig};
pub use lexical::{LexicalConfig, LexicalIndex};
pub use retriever::{HybridRetriever, RetrieverConfig};
pub use vector_store::{SearchFilter, VectorStore, VectorStoreConfig};

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<RetrievalError> for docqa_core::Error {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::Embedding(msg) => docqa_core::Error::Embedding(msg),
            other => docqa_core::Error::Retrieval(other.to_string()),
        }
    }
}
