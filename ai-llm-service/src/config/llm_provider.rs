//! Supported LLM providers and their environment/default wiring.

use crate::error_handler::{AiLlmError, ConfigError};

/// Represents the provider (backend) used for LLM inference.
///
/// All three providers expose an OpenAI-compatible chat-completions API,
/// so they differ only in endpoint, model naming, and credentials.
/// Adding more OpenAI-compatible providers is a matter of extending this
/// enum and its wiring tables below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI's API.
    OpenAi,
    /// DeepSeek's hosted API.
    DeepSeek,
    /// Alibaba Qwen via the DashScope compatible-mode endpoint.
    Qwen,
}

impl LlmProvider {
    /// Parses a provider identifier as found in `LLM_PROVIDER`.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedProvider`] for unknown values.
    pub fn parse(value: &str) -> Result<Self, AiLlmError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "deepseek" => Ok(Self::DeepSeek),
            "qwen" => Ok(Self::Qwen),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        }
    }

    /// Stable lowercase identifier, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
            Self::Qwen => "qwen",
        }
    }

    /// API base used when the endpoint variable is unset.
    ///
    /// The base already includes the version segment; clients append
    /// `/chat/completions`.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::DeepSeek => "https://api.deepseek.com/v1",
            Self::Qwen => "https://dashscope.aliyuncs.com/compatible-mode/v1",
        }
    }

    /// Model used when the model variable is unset.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::DeepSeek => "deepseek-chat",
            Self::Qwen => "qwen-turbo",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::Qwen => "QWEN_API_KEY",
        }
    }

    /// Environment variable overriding the API base.
    pub fn base_url_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_BASE_URL",
            Self::DeepSeek => "DEEPSEEK_BASE_URL",
            Self::Qwen => "QWEN_BASE_URL",
        }
    }

    /// Environment variable overriding the model.
    pub fn model_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_MODEL",
            Self::DeepSeek => "DEEPSEEK_MODEL",
            Self::Qwen => "QWEN_MODEL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_providers() {
        assert_eq!(LlmProvider::parse("openai").unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            LlmProvider::parse(" DeepSeek ").unwrap(),
            LlmProvider::DeepSeek
        );
        assert_eq!(LlmProvider::parse("qwen").unwrap(), LlmProvider::Qwen);
    }

    #[test]
    fn parse_rejects_unknown_provider() {
        assert!(LlmProvider::parse("mistral").is_err());
    }
}
