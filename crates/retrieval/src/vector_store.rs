//! Vector store using Qdrant
//!
//! Semantic adapter for hybrid retrieval: approximate nearest-neighbor
//! search over pre-embedded document chunks, with the candidate pool
//! surfaced as the HNSW `ef` search parameter.

use std::collections::HashMap;

use qdrant_client::{
    qdrant::{
        value::Kind, Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, PointId,
        PointStruct, PointsIdsList, SearchParamsBuilder, SearchPointsBuilder,
        UpsertPointsBuilder, VectorParamsBuilder,
    },
    Qdrant,
};

use docqa_core::Passage;
use docqa_config::SearchSettings;

use crate::RetrievalError;

/// Vector store configuration
#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    /// Qdrant endpoint
    pub endpoint: String,
    /// Collection name
    pub collection: String,
    /// Vector dimension
    pub vector_dim: usize,
    /// API key (optional)
    pub api_key: Option<String>,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: docqa_config::constants::endpoints::QDRANT_DEFAULT.to_string(),
            collection: docqa_config::constants::index::COLLECTION.to_string(),
            vector_dim: docqa_config::constants::models::EMBEDDING_DIM,
            api_key: None,
        }
    }
}

impl From<&SearchSettings> for VectorStoreConfig {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            endpoint: settings.qdrant_endpoint.clone(),
            collection: settings.collection.clone(),
            vector_dim: settings.vector_dim,
            api_key: settings.qdrant_api_key.clone(),
        }
    }
}

/// Predicate filter applied by both adapters
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Restrict hits to one originating document
    pub source: Option<String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    fn into_qdrant(self) -> qdrant_client::qdrant::Filter {
        let mut conditions = Vec::new();

        if let Some(source) = self.source {
            conditions.push(Condition::matches("source", source));
        }

        qdrant_client::qdrant::Filter {
            must: conditions,
            ..Default::default()
        }
    }
}

/// Qdrant-backed vector store
pub struct VectorStore {
    client: Qdrant,
    config: VectorStoreConfig,
}

impl VectorStore {
    /// Connect to Qdrant
    pub fn new(config: VectorStoreConfig) -> Result<Self, RetrievalError> {
        let mut builder = Qdrant::from_url(&config.endpoint);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
            tracing::info!("qdrant connection using API key authentication");
        }

        let client = builder
            .build()
            .map_err(|e| RetrievalError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create the collection if it does not exist
    pub async fn ensure_collection(&self) -> Result<(), RetrievalError> {
        let exists = self
            .client
            .collection_exists(&self.config.collection)
            .await
            .map_err(|e| RetrievalError::VectorStore(e.to_string()))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.config.collection).vectors_config(
                        VectorParamsBuilder::new(self.config.vector_dim as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| RetrievalError::VectorStore(e.to_string()))?;
        }

        Ok(())
    }

    /// Insert passages with pre-computed embeddings (ingestion tooling)
    pub async fn upsert(
        &self,
        passages: &[Passage],
        embeddings: &[Vec<f32>],
    ) -> Result<(), RetrievalError> {
        if passages.len() != embeddings.len() {
            return Err(RetrievalError::VectorStore(
                "Passage and embedding count mismatch".to_string(),
            ));
        }

        let points: Vec<PointStruct> = passages
            .iter()
            .zip(embeddings.iter())
            .map(|(passage, emb)| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("text".to_string(), passage.content.clone().into());

                if let Some(ref source) = passage.source {
                    payload.insert("source".to_string(), source.clone().into());
                }
                if let Some(page) = passage.page {
                    payload.insert("page".to_string(), (page as i64).into());
                }

                PointStruct::new(passage.id.clone(), emb.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.config.collection, points))
            .await
            .map_err(|e| RetrievalError::VectorStore(e.to_string()))?;

        Ok(())
    }

    /// ANN search over a candidate pool
    ///
    /// The pool is widened to at least `limit` before being handed to
    /// the index as `hnsw_ef`.
    pub async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        candidate_pool: usize,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<Passage>, RetrievalError> {
        let pool = candidate_pool.max(limit);

        let mut search_builder = SearchPointsBuilder::new(
            &self.config.collection,
            query_embedding.to_vec(),
            limit as u64,
        )
        .params(SearchParamsBuilder::default().hnsw_ef(pool as u64))
        .with_payload(true);

        if let Some(f) = filter {
            search_builder = search_builder.filter(f.into_qdrant());
        }

        let results = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| RetrievalError::Search(e.to_string()))?;

        let passages: Vec<Passage> = results
            .result
            .into_iter()
            .map(|point| {
                let mut content = String::new();
                let mut source = None;
                let mut page = None;

                for (k, v) in point.payload {
                    match (k.as_str(), v.kind) {
                        ("text", Some(Kind::StringValue(s))) => content = s,
                        ("source", Some(Kind::StringValue(s))) => source = Some(s),
                        ("page", Some(Kind::IntegerValue(n))) => page = Some(n as u32),
                        _ => {}
                    }
                }

                let id = point
                    .id
                    .and_then(|pid| pid.point_id_options)
                    .map(|opts| match opts {
                        qdrant_client::qdrant::point_id::PointIdOptions::Uuid(u) => u,
                        qdrant_client::qdrant::point_id::PointIdOptions::Num(n) => n.to_string(),
                    })
                    .unwrap_or_default();

                Passage {
                    id,
                    content,
                    source,
                    page,
                    lexical_score: 0.0,
                    semantic_score: point.score,
                }
            })
            .collect();

        Ok(passages)
    }

    /// Delete points by id
    pub async fn delete(&self, ids: &[String]) -> Result<(), RetrievalError> {
        let points: Vec<PointId> = ids.iter().map(|id| PointId::from(id.clone())).collect();

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.config.collection)
                    .points(PointsIdsList { ids: points }),
            )
            .await
            .map_err(|e| RetrievalError::VectorStore(e.to_string()))?;

        Ok(())
    }

    /// Stored point count
    pub async fn point_count(&self) -> Result<u64, RetrievalError> {
        let info = self
            .client
            .collection_info(&self.config.collection)
            .await
            .map_err(|e| RetrievalError::VectorStore(e.to_string()))?;

        Ok(info
            .result
            .and_then(|r| r.points_count)
            .unwrap_or_default())
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }
}
