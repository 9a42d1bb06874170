//! Unified error handling for `ai-llm-service`.
//!
//! One top-level [`AiLlmError`] for the whole crate, with domain-specific
//! enums nested under it ([`ConfigError`], [`ProviderError`]). Small
//! helpers for environment access and log snippets live here too, so
//! callers and services share the same conventions.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup or backend construction).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider call errors (status, decoding, empty output).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (includes timeouts).
    #[error("transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unsupported provider in `LLM_PROVIDER`.
    #[error("unsupported llm provider: {0}")]
    UnsupportedProvider(String),

    /// API key required by the provider is absent.
    #[error("missing api key in {0}")]
    MissingApiKey(&'static str),

    /// Endpoint had the wrong format.
    #[error("invalid endpoint: {0} (must start with http:// or https://)")]
    InvalidEndpoint(String),
}

/// Error enum for a provider call that reached the backend.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream returned a non-successful HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        /// Short, single-line excerpt of the response body.
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The completion response contained no usable choice.
    #[error("empty choices in completion response")]
    EmptyChoices,
}

/// Reads an environment variable, falling back to `default` when the
/// variable is absent or blank.
pub fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Produces a single-line, length-bounded excerpt of a response body for
/// logging and error messages.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 240;
    let flat: String = body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match flat.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &flat[..idx]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let body = "line one\nline two\n".repeat(100);
        let snippet = make_snippet(&body);
        assert!(!snippet.contains('\n'));
        assert!(snippet.chars().count() <= 241);
    }

    #[test]
    fn env_or_falls_back_on_missing() {
        assert_eq!(env_or("AI_LLM_SERVICE_UNSET_VAR", "fallback"), "fallback");
    }
}
