//! Crate-wide error hierarchy for change-reviewer.
//!
//! Goals:
//! - Single root `Error` for all public functions.
//! - Origin-aware mapping (401→Unauthorized, 429→RateLimited, 5xx→Server, etc.).
//! - No dynamic dispatch, ergonomic `?` via `From` impls.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type CrResult<T> = Result<T, Error>;

/// Root error type for the change-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Origin (GitHub/GitLab) related failure.
    #[error(transparent)]
    Origin(#[from] OriginError),

    /// Chat-webhook delivery failure.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Configuration problems (bad numbers, unknown tone, etc.).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input validation errors (mismatched origin/source combinations).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Detailed origin-specific error used by the provider clients.
#[derive(Debug, Error)]
pub enum OriginError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Gateway/Server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (4xx/3xx) not covered above.
    #[error("http status error: {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Access token for the origin is not configured.
    #[error("missing access token: {0} is not set")]
    MissingToken(&'static str),
}

/// Chat-webhook delivery errors (transport level only; an application
/// level `errcode` in the response is logged, not raised).
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("timeout")]
    Timeout,

    #[error("http status error: {0}")]
    HttpStatus(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(String),
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error("unknown review style: {0} (expected professional|friendly)")]
    UnknownStyle(String),

    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Origin(OriginError::from(e))
    }
}

impl From<reqwest::Error> for OriginError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return OriginError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => OriginError::Unauthorized,
                403 => OriginError::Forbidden,
                404 => OriginError::NotFound,
                429 => OriginError::RateLimited,
                500..=599 => OriginError::Server(code),
                _ => OriginError::HttpStatus(code),
            };
        }
        if e.is_decode() {
            return OriginError::Decode(e.to_string());
        }
        OriginError::Network(e.to_string())
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return NotifyError::Timeout;
        }
        if let Some(status) = e.status() {
            return NotifyError::HttpStatus(status.as_u16());
        }
        if e.is_decode() {
            return NotifyError::Decode(e.to_string());
        }
        NotifyError::Network(e.to_string())
    }
}
