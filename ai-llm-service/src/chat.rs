//! Chat message shape shared by all providers.

use serde::Serialize;

/// One role/content pair in a chat-completions request.
///
/// Order matters: providers receive the messages exactly as given.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// One of: "system" | "user" | "assistant".
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    /// Builds a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    /// Builds a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}
