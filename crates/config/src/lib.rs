//! Configuration management for the document QA pipeline
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (DOCQA_ prefix)
//!
//! Secrets (API keys, connection strings) are read from the process
//! environment at startup; the upstream secret provider that populates
//! those variables is an external concern.

pub mod constants;
pub mod settings;
pub mod telemetry;

pub use settings::{
    load_settings, ModelSettings, ObservabilityConfig, RetrievalSettings, RuntimeEnvironment,
    SearchSettings, Settings,
};
pub use telemetry::init_tracing;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Missing environment value: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
