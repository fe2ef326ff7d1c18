//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// RUST_LOG takes precedence over the configured level. Safe to call
/// once per process; subsequent calls are ignored.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let builder = fmt().with_env_filter(filter);

    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
