//! Remote embedding client
//!
//! Converts query text into a fixed-length vector via an
//! OpenAI-compatible embeddings endpoint (same URL and auth shape as
//! the chat backend, including the Azure deployment format).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use docqa_core::TextEmbedder;
use docqa_config::ModelSettings;

use crate::LlmError;

/// Embedding client configuration
#[derive(Debug, Clone)]
pub struct EmbeddingClientConfig {
    /// API endpoint
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Model name, or Azure deployment name
    pub model: String,
    /// Azure API version; None selects the standard OpenAI URL format
    pub api_version: Option<String>,
    /// Vector dimension produced by the model
    pub embedding_dim: usize,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for EmbeddingClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "text-embedding-3-small".to_string(),
            api_version: None,
            embedding_dim: 1536,
            timeout: Duration::from_secs(30),
        }
    }
}

impl EmbeddingClientConfig {
    /// Derive embedding config from settings
    pub fn from_settings(settings: &ModelSettings, embedding_dim: usize) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.embedding_deployment.clone(),
            api_version: settings.api_version.clone(),
            embedding_dim,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// OpenAI-compatible embedding client
pub struct EmbeddingClient {
    client: Client,
    config: EmbeddingClientConfig,
}

impl EmbeddingClient {
    pub fn new(config: EmbeddingClientConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                LlmError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn embeddings_url(&self) -> String {
        if let Some(ref api_version) = self.config.api_version {
            format!(
                "{}/openai/deployments/{}/embeddings?api-version={}",
                self.config.endpoint.trim_end_matches('/'),
                self.config.model,
                api_version
            )
        } else {
            format!(
                "{}/embeddings",
                self.config.endpoint.trim_end_matches('/')
            )
        }
    }

    async fn embed_raw(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = EmbedRequest {
            model: self.config.model.clone(),
            input: text.to_string(),
        };

        let mut builder = self.client.post(self.embeddings_url()).json(&request);

        if self.config.api_version.is_some() {
            builder = builder.header("api-key", &self.config.api_key);
        } else {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!(
                "Embedding request failed: {} - {}",
                status, text
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::InvalidResponse("No embedding returned".to_string()))
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TextEmbedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> docqa_core::Result<Vec<f32>> {
        let vector = self.embed_raw(text).await?;

        if vector.len() != self.config.embedding_dim {
            return Err(docqa_core::Error::Embedding(format!(
                "Unexpected embedding dimension: {} (expected {})",
                vector.len(),
                self.config.embedding_dim
            )));
        }

        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.config.embedding_dim
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}
