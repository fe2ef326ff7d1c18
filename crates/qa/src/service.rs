//! Settings-driven service wiring
//!
//! Builds the production pipeline from `Settings`: one set of
//! process-lived client handles (chat, embeddings, qdrant, tantivy),
//! shared by all concurrent requests. No per-request re-authentication
//! and no cross-request result caching.

use std::sync::Arc;

use docqa_core::{QaErrorResponse, QaResult, Result};
use docqa_config::Settings;
use docqa_llm::{
    backend::{OpenAiBackend, OpenAiConfig},
    embeddings::{EmbeddingClient, EmbeddingClientConfig},
};
use docqa_retrieval::{
    HybridRetriever, LexicalConfig, LexicalIndex, RetrieverConfig, VectorStore, VectorStoreConfig,
};

use crate::pipeline::{PipelineConfig, QaPipeline};

/// Fully wired QA service
pub struct QaService {
    pipeline: QaPipeline,
}

impl QaService {
    /// Construct all clients and the pipeline from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let chat = Arc::new(OpenAiBackend::new(OpenAiConfig::from_settings(
            &settings.models,
        ))?);

        let embedder = Arc::new(EmbeddingClient::new(EmbeddingClientConfig::from_settings(
            &settings.models,
            settings.search.vector_dim,
        ))?);

        let vector_store = Arc::new(VectorStore::new(VectorStoreConfig::from(&settings.search))?);

        let lexical_index = Arc::new(LexicalIndex::new(LexicalConfig {
            index_path: settings.search.lexical_index_path.clone(),
            stemming: true,
        })?);

        let retriever = Arc::new(HybridRetriever::new(
            RetrieverConfig::from(&settings.retrieval),
            embedder,
            vector_store,
            lexical_index,
        ));

        let pipeline = QaPipeline::new(retriever, chat, PipelineConfig::from(settings));

        Ok(Self { pipeline })
    }

    /// Answer a question; see `QaPipeline::answer`
    pub async fn answer(&self, question: &str) -> Result<QaResult> {
        self.pipeline.answer(question).await
    }

    /// Answer a question with errors shaped for the transport surface
    pub async fn answer_report(
        &self,
        question: &str,
    ) -> std::result::Result<QaResult, QaErrorResponse> {
        self.pipeline.answer_report(question).await
    }

    pub fn pipeline(&self) -> &QaPipeline {
        &self.pipeline
    }
}
