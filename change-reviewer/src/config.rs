//! Pipeline configuration, resolved once at process start.
//!
//! Everything here is immutable after construction. Handlers share one
//! value behind an `Arc`; there is no mutable singleton. Missing origin
//! tokens and missing webhook URLs are deliberately *not* load errors:
//! they are per-event configuration gaps handled (and logged) by the
//! step that needs them.

use std::collections::HashMap;

use ai_llm_service::LlmModelConfig;

use crate::errors::{ConfigError, CrResult};

/// Immutable configuration shared by every review task.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub origins: OriginsConfig,
    pub llm: LlmModelConfig,
    pub review: ReviewConfig,
    pub wecom: WecomConfig,
}

impl PipelineConfig {
    /// Loads the full pipeline configuration from the environment.
    pub fn from_env() -> CrResult<Self> {
        Ok(Self {
            origins: OriginsConfig::from_env(),
            llm: LlmModelConfig::from_env().map_err(ConfigError::Llm)?,
            review: ReviewConfig::from_env()?,
            wecom: WecomConfig::from_env(),
        })
    }
}

/// API bases and access tokens for the supported origins.
#[derive(Debug, Clone)]
pub struct OriginsConfig {
    /// API base for GitLab, e.g. "https://gitlab.com/api/v4".
    pub gitlab_api_base: String,
    /// Token for GitLab API ("PRIVATE-TOKEN" PAT or project access token).
    pub gitlab_token: Option<String>,
    /// API base for GitHub, e.g. "https://api.github.com".
    pub github_api_base: String,
    /// Token for GitHub API (classic PAT or app token).
    pub github_token: Option<String>,
}

impl OriginsConfig {
    pub fn from_env() -> Self {
        Self {
            gitlab_api_base: env_or("GITLAB_API_BASE", "https://gitlab.com/api/v4"),
            gitlab_token: env_opt("GITLAB_TOKEN"),
            github_api_base: env_or("GITHUB_API_BASE", "https://api.github.com"),
            github_token: env_opt("GITHUB_TOKEN"),
        }
    }
}

/// Tone register for the generated review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTone {
    Professional,
    Friendly,
}

impl ReviewTone {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "friendly" => Ok(Self::Friendly),
            other => Err(ConfigError::UnknownStyle(other.to_string())),
        }
    }
}

/// Review knobs: truncation budget, tone, gating threshold.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Token budget for the diff sent to the AI backend.
    pub max_tokens: usize,
    /// Tone register used in the system prompt.
    pub tone: ReviewTone,
    /// Requests scoring strictly below this are closed automatically.
    /// 0.0 leaves gating inert.
    pub min_score: f64,
}

impl ReviewConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_tokens = match env_opt("REVIEW_MAX_TOKENS") {
            Some(raw) => raw.parse::<usize>().map_err(|_| ConfigError::InvalidNumber {
                var: "REVIEW_MAX_TOKENS",
                reason: "expected usize",
            })?,
            None => 10_000,
        };
        let tone = match env_opt("REVIEW_STYLE") {
            Some(raw) => ReviewTone::parse(&raw)?,
            None => ReviewTone::Professional,
        };
        let min_score = match env_opt("REVIEW_MIN_SCORE") {
            Some(raw) => raw.parse::<f64>().map_err(|_| ConfigError::InvalidNumber {
                var: "REVIEW_MIN_SCORE",
                reason: "expected f64",
            })?,
            None => 0.0,
        };

        Ok(Self {
            max_tokens,
            tone,
            min_score,
        })
    }
}

/// Chat-webhook delivery configuration.
///
/// Per-project overrides come from `WECOM_WEBHOOK_URL_<PROJECT>` entries,
/// scanned once here so that delivery never consults the environment.
#[derive(Debug, Clone)]
pub struct WecomConfig {
    pub enabled: bool,
    pub default_webhook_url: Option<String>,
    pub project_webhook_urls: HashMap<String, String>,
}

impl WecomConfig {
    const OVERRIDE_PREFIX: &'static str = "WECOM_WEBHOOK_URL_";

    pub fn from_env() -> Self {
        let project_webhook_urls = std::env::vars()
            .filter_map(|(key, value)| {
                let suffix = key.strip_prefix(Self::OVERRIDE_PREFIX)?;
                if suffix.is_empty() || value.trim().is_empty() {
                    return None;
                }
                Some((suffix.to_string(), value))
            })
            .collect();

        Self {
            enabled: env_opt("WECOM_ENABLED").as_deref() == Some("1"),
            default_webhook_url: env_opt("WECOM_WEBHOOK_URL"),
            project_webhook_urls,
        }
    }

    /// Resolves the delivery endpoint for a project: the project-specific
    /// override when present, otherwise the default URL.
    pub fn webhook_for(&self, project_name: &str) -> Option<&str> {
        let key = project_env_key(project_name);
        self.project_webhook_urls
            .get(&key)
            .or(self.default_webhook_url.as_ref())
            .map(String::as_str)
    }
}

/// Maps a project name onto the environment key suffix used for webhook
/// overrides: uppercased, any non-alphanumeric collapsed to `_`.
fn project_env_key(project_name: &str) -> String {
    project_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
