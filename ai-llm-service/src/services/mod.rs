//! Backend facade without async-trait or dynamic trait objects.
//!
//! `LlmBackend` is an enum over concrete per-provider clients. The three
//! supported providers all speak the OpenAI chat-completions wire format,
//! so the variants share one [`chat_completions::ChatCompletionsClient`]
//! and differ only in configuration and log labels.

pub mod chat_completions;

use crate::{
    chat::ChatMessage,
    config::llm_model_config::LlmModelConfig,
    error_handler::AiLlmError,
};
use chat_completions::ChatCompletionsClient;

/// Concrete chat backend (enum-dispatch).
#[derive(Debug)]
pub enum LlmBackend {
    OpenAi(ChatCompletionsClient),
    DeepSeek(ChatCompletionsClient),
    Qwen(ChatCompletionsClient),
}

impl LlmBackend {
    /// Constructs the backend selected by `cfg.provider`.
    ///
    /// # Errors
    /// Propagates client construction errors (missing API key, invalid
    /// endpoint, HTTP client build failure).
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        use crate::config::llm_provider::LlmProvider;

        let client = ChatCompletionsClient::new(cfg.clone())?;
        Ok(match cfg.provider {
            LlmProvider::OpenAi => Self::OpenAi(client),
            LlmProvider::DeepSeek => Self::DeepSeek(client),
            LlmProvider::Qwen => Self::Qwen(client),
        })
    }

    /// Runs one non-streaming chat completion and returns the first
    /// choice's message content.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        self.client().chat(messages).await
    }

    fn client(&self) -> &ChatCompletionsClient {
        match self {
            Self::OpenAi(c) | Self::DeepSeek(c) | Self::Qwen(c) => c,
        }
    }
}
