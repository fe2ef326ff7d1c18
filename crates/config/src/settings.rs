//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{endpoints, index, models, retrieval};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Chat and embedding model access
    #[serde(default)]
    pub models: ModelSettings,

    /// Lexical and vector index access
    #[serde(default)]
    pub search: SearchSettings,

    /// Fusion and over-fetch tuning
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Chat/embedding deployment settings
///
/// `endpoint` plus `api_version` selects Azure OpenAI URL shape;
/// without `api_version` the standard OpenAI path is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// API endpoint
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// API key, from the environment by default
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Azure API version; None selects the standard OpenAI URL format
    #[serde(default = "default_api_version")]
    pub api_version: Option<String>,

    /// Chat deployment/model name
    #[serde(default = "default_chat_deployment")]
    pub chat_deployment: String,

    /// Embedding deployment/model name
    #[serde(default = "default_embedding_deployment")]
    pub embedding_deployment: String,

    /// Sampling temperature for answer generation
    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f32,

    /// Sampling temperature for the judge call
    #[serde(default = "default_judge_temperature")]
    pub judge_temperature: f32,

    /// Completion token budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Per-call HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_openai_endpoint() -> String {
    std::env::var("AZURE_OPENAI_ENDPOINT")
        .unwrap_or_else(|_| endpoints::OPENAI_DEFAULT.to_string())
}

fn default_api_key() -> String {
    std::env::var("AZURE_OPENAI_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .unwrap_or_default()
}

fn default_api_version() -> Option<String> {
    match std::env::var("AZURE_OPENAI_API_VERSION") {
        Ok(v) => Some(v),
        // Azure URL shape only applies when an Azure endpoint is set
        Err(_) if std::env::var("AZURE_OPENAI_ENDPOINT").is_ok() => {
            Some(models::API_VERSION.to_string())
        }
        Err(_) => None,
    }
}

fn default_chat_deployment() -> String {
    std::env::var("AZURE_OPENAI_CHAT_DEPLOYMENT")
        .unwrap_or_else(|_| models::CHAT_DEPLOYMENT.to_string())
}

fn default_embedding_deployment() -> String {
    std::env::var("AZURE_OPENAI_EMB_DEPLOYMENT")
        .unwrap_or_else(|_| models::EMBEDDING_DEPLOYMENT.to_string())
}

fn default_generation_temperature() -> f32 {
    models::GENERATION_TEMPERATURE
}

fn default_judge_temperature() -> f32 {
    models::JUDGE_TEMPERATURE
}

fn default_max_tokens() -> usize {
    models::MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    models::TIMEOUT_SECS
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: default_openai_endpoint(),
            api_key: default_api_key(),
            api_version: default_api_version(),
            chat_deployment: default_chat_deployment(),
            embedding_deployment: default_embedding_deployment(),
            generation_temperature: default_generation_temperature(),
            judge_temperature: default_judge_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Index access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Qdrant endpoint
    #[serde(default = "default_qdrant_endpoint")]
    pub qdrant_endpoint: String,

    /// Qdrant API key (optional)
    #[serde(default = "default_qdrant_api_key")]
    pub qdrant_api_key: Option<String>,

    /// Qdrant collection name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Vector dimension of the collection
    #[serde(default = "default_vector_dim")]
    pub vector_dim: usize,

    /// On-disk tantivy index path (RAM index if None)
    #[serde(default)]
    pub lexical_index_path: Option<String>,
}

fn default_qdrant_endpoint() -> String {
    std::env::var("QDRANT_ENDPOINT").unwrap_or_else(|_| endpoints::QDRANT_DEFAULT.to_string())
}

fn default_qdrant_api_key() -> Option<String> {
    std::env::var("QDRANT_API_KEY").ok()
}

fn default_collection() -> String {
    index::COLLECTION.to_string()
}

fn default_vector_dim() -> usize {
    models::EMBEDDING_DIM
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            qdrant_endpoint: default_qdrant_endpoint(),
            qdrant_api_key: default_qdrant_api_key(),
            collection: default_collection(),
            vector_dim: default_vector_dim(),
            lexical_index_path: None,
        }
    }
}

/// Fusion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Final fused passage count
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// RRF damping constant
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f64,

    /// ANN candidate pool width
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,
}

fn default_top_k() -> usize {
    retrieval::DEFAULT_TOP_K
}

fn default_rrf_k() -> f64 {
    retrieval::RRF_K
}

fn default_candidate_pool() -> usize {
    retrieval::CANDIDATE_POOL
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            rrf_k: default_rrf_k(),
            candidate_pool: default_candidate_pool(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted log lines
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::Validation(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }

        if self.retrieval.rrf_k <= 0.0 {
            return Err(ConfigError::Validation(
                "retrieval.rrf_k must be positive".to_string(),
            ));
        }

        if self.retrieval.candidate_pool < self.retrieval.top_k {
            return Err(ConfigError::Validation(format!(
                "retrieval.candidate_pool ({}) must be >= top_k ({})",
                self.retrieval.candidate_pool, self.retrieval.top_k
            )));
        }

        if self.search.vector_dim == 0 {
            return Err(ConfigError::Validation(
                "search.vector_dim must be positive".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.models.generation_temperature) {
            return Err(ConfigError::Validation(
                "models.generation_temperature must be in [0, 2]".to_string(),
            ));
        }

        // Missing API key is fatal only outside development
        if self.models.api_key.is_empty() {
            if self.environment.is_strict() {
                return Err(ConfigError::Environment(
                    "models.api_key is required (set AZURE_OPENAI_API_KEY or OPENAI_API_KEY)"
                        .to_string(),
                ));
            }
            tracing::warn!("no model API key configured; model calls will fail");
        }

        Ok(())
    }
}

/// Load settings from an optional file plus DOCQA_-prefixed environment
/// variables (e.g. DOCQA_RETRIEVAL__TOP_K=6)
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !Path::new(path).exists() {
            return Err(ConfigError::FileNotFound(path.to_string()));
        }
        builder = builder.add_source(File::with_name(path));
    }

    builder = builder.add_source(Environment::with_prefix("DOCQA").separator("__"));

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
