//! Capability traits for pluggable backends
//!
//! All external capabilities sit behind these traits so the pipeline can
//! be wired with production clients or test stubs without code changes.
//! Implementations must be safe for concurrent use by multiple in-flight
//! requests; handles are shared as `Arc<dyn Trait>`.

use async_trait::async_trait;

use crate::error::Result;
use crate::passage::Passage;

/// Chat-completion capability
///
/// Used twice per request: once to generate the grounded answer, once to
/// judge it, with different instructions and the caller's temperature.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion with a system instruction and a user turn
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String>;

    /// Model or deployment name, for logging
    fn model_name(&self) -> &str;
}

/// Embedding capability: text to a fixed-length vector
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Vector dimension produced by this embedder
    fn dim(&self) -> usize;
}

/// Retrieval seam between the orchestrator and the hybrid retriever
#[async_trait]
pub trait PassageRetriever: Send + Sync {
    /// Return the fused top `top_k` passages for a query
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Passage>>;
}
