//! Shared LLM chat service with interchangeable providers.
//!
//! All supported backends (OpenAI, DeepSeek, Qwen) speak the OpenAI
//! chat-completions wire format, so the crate exposes a single request
//! shape (an ordered list of role/content messages) and returns the
//! first completion's text. Provider selection happens once, at
//! configuration time; dispatch is enum-based (no `async-trait`, no
//! boxed futures).
//!
//! Entry points:
//! - [`config::llm_model_config::LlmModelConfig::from_env`] resolves a
//!   backend configuration from the environment.
//! - [`services::LlmBackend::from_config`] builds the concrete client.
//! - [`services::LlmBackend::chat`] runs one non-streaming completion.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod services;

pub use chat::ChatMessage;
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
pub use services::LlmBackend;
