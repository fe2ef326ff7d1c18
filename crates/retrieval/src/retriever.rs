//! Hybrid retriever
//!
//! Over-fetches from the lexical and semantic adapters concurrently,
//! then fuses both lists with RRF. Tantivy search is CPU-bound and runs
//! in `spawn_blocking` so it does not stall the async executor.

use std::sync::Arc;

use async_trait::async_trait;

use docqa_core::{Passage, PassageRetriever, TextEmbedder};
use docqa_config::constants::retrieval;
use docqa_config::RetrievalSettings;

use crate::fusion::{fuse, FusionConfig};
use crate::lexical::LexicalIndex;
use crate::vector_store::{SearchFilter, VectorStore};
use crate::RetrievalError;

/// Retriever configuration
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Final number of fused results
    pub top_k: usize,
    /// RRF damping constant
    pub rrf_k: f64,
    /// ANN candidate pool width
    pub candidate_pool: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: retrieval::DEFAULT_TOP_K,
            rrf_k: retrieval::RRF_K,
            candidate_pool: retrieval::CANDIDATE_POOL,
        }
    }
}

impl From<&RetrievalSettings> for RetrieverConfig {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            top_k: settings.top_k,
            rrf_k: settings.rrf_k,
            candidate_pool: settings.candidate_pool,
        }
    }
}

/// Per-adapter over-fetch breadth feeding fusion
fn overfetch_limit(top_k: usize) -> usize {
    (top_k * retrieval::OVERFETCH_FACTOR).max(retrieval::MIN_OVERFETCH)
}

/// Hybrid retriever combining lexical and semantic search
pub struct HybridRetriever {
    config: RetrieverConfig,
    embedder: Arc<dyn TextEmbedder>,
    vector_store: Arc<VectorStore>,
    lexical_index: Arc<LexicalIndex>,
}

impl HybridRetriever {
    pub fn new(
        config: RetrieverConfig,
        embedder: Arc<dyn TextEmbedder>,
        vector_store: Arc<VectorStore>,
        lexical_index: Arc<LexicalIndex>,
    ) -> Self {
        Self {
            config,
            embedder,
            vector_store,
            lexical_index,
        }
    }

    /// Semantic search: embed the query, then ANN over the candidate pool
    pub async fn search_semantic(
        &self,
        query: &str,
        limit: usize,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<Passage>, RetrievalError> {
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        self.vector_store
            .search(&embedding, limit, self.config.candidate_pool, filter)
            .await
    }

    /// Lexical search off the async executor
    pub async fn search_lexical(
        &self,
        query: &str,
        limit: usize,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<Passage>, RetrievalError> {
        let index = Arc::clone(&self.lexical_index);
        let query = query.to_string();

        tokio::task::spawn_blocking(move || index.search(&query, limit, filter.as_ref()))
            .await
            .map_err(|e| RetrievalError::Search(format!("Lexical search task failed: {}", e)))?
    }

    /// Hybrid search with RRF fusion
    pub async fn search(
        &self,
        query: &str,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<Passage>, RetrievalError> {
        self.search_top_k(query, self.config.top_k, filter).await
    }

    async fn search_top_k(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<Passage>, RetrievalError> {
        let breadth = overfetch_limit(top_k);

        let semantic_future = self.search_semantic(query, breadth, filter.clone());
        let lexical_future = self.search_lexical(query, breadth, filter);

        let (semantic_result, lexical_result) = tokio::join!(semantic_future, lexical_future);
        let semantic = semantic_result?;
        let lexical = lexical_result?;

        tracing::debug!(
            lexical_hits = lexical.len(),
            semantic_hits = semantic.len(),
            breadth,
            "fusing candidate lists"
        );

        let fusion_config = FusionConfig {
            rrf_k: self.config.rrf_k,
            top_k,
        };

        Ok(fuse(lexical, semantic, &fusion_config))
    }
}

#[async_trait]
impl PassageRetriever for HybridRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> docqa_core::Result<Vec<Passage>> {
        Ok(self.search_top_k(query, top_k, None).await?)
    }
}
