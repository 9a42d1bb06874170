//! Configuration for one LLM backend invocation profile.

use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{AiLlmError, env_or},
};

/// Configuration for an LLM chat backend.
///
/// Built once at process start and treated as immutable afterwards.
/// The API key is optional at load time: a missing key is a
/// configuration gap surfaced when the backend is constructed, so that
/// the owning process can degrade instead of refusing to boot.
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-3.5-turbo"`, `"deepseek-chat"`).
    pub model: String,

    /// API base including the version segment (e.g., `https://api.openai.com/v1`).
    pub endpoint: String,

    /// API key for bearer authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Resolves the active backend configuration from the environment.
    ///
    /// `LLM_PROVIDER` selects the backend (default `openai`); the
    /// provider-specific `*_BASE_URL` / `*_MODEL` / `*_API_KEY` variables
    /// override the provider defaults. Generation parameters are fixed
    /// for the review use case: temperature 0.3, 2000 output tokens,
    /// 60-second timeout.
    ///
    /// # Errors
    /// Returns [`AiLlmError::Config`] if `LLM_PROVIDER` names an
    /// unsupported backend.
    pub fn from_env() -> Result<Self, AiLlmError> {
        let provider = LlmProvider::parse(&env_or("LLM_PROVIDER", "openai"))?;

        let endpoint = env_or(provider.base_url_var(), provider.default_endpoint());
        let model = env_or(provider.model_var(), provider.default_model());
        let api_key = std::env::var(provider.api_key_var())
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            provider,
            model,
            endpoint,
            api_key,
            max_tokens: Some(2000),
            temperature: Some(0.3),
            timeout_secs: Some(60),
        })
    }
}
