use std::sync::Arc;

use change_reviewer::config::PipelineConfig;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Listen address, e.g. "0.0.0.0:7001".
    pub listen_addr: String,
    /// Immutable pipeline configuration shared with every spawned task.
    pub config: Arc<PipelineConfig>,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, change_reviewer::errors::Error> {
        Ok(Self {
            listen_addr: std::env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:7001".into()),
            config: Arc::new(PipelineConfig::from_env()?),
        })
    }
}
