//! Prompt construction, AI invocation, and response post-processing.
//!
//! The reviewer never fails the pipeline: an unreachable or misbehaving
//! backend yields a fixed fallback report instead of an error. The
//! fallback carries no score line, so downstream gating sees `None` and
//! leaves the request alone.

use ai_llm_service::{ChatMessage, LlmBackend, LlmModelConfig};
use tracing::{debug, error};

use crate::config::ReviewTone;

/// Report used when the diff is empty after trimming.
pub const EMPTY_DIFF_REPORT: &str = "The diff is empty, nothing to review.";

/// Report used when the backend answered with an empty body.
pub const EMPTY_RESPONSE_REPORT: &str = "The review came back empty.";

/// Report used when the backend call failed.
pub const FAILED_REVIEW_REPORT: &str = "Code review failed, please retry later.";

/// Reviews a (pre-truncated) diff and returns the report text.
///
/// Short-circuits on empty diffs without touching the backend. Backend
/// construction errors (missing API key, bad endpoint) and call failures
/// are logged and replaced by [`FAILED_REVIEW_REPORT`].
pub async fn review_diff(
    llm: &LlmModelConfig,
    diff: &str,
    context_message: &str,
    tone: ReviewTone,
) -> String {
    if diff.trim().is_empty() {
        return EMPTY_DIFF_REPORT.to_string();
    }

    let backend = match LlmBackend::from_config(llm.clone()) {
        Ok(backend) => backend,
        Err(e) => {
            error!(error = %e, "ai backend unavailable");
            return FAILED_REVIEW_REPORT.to_string();
        }
    };

    let messages = build_messages(diff, context_message, tone);
    debug!(
        provider = llm.provider.as_str(),
        diff_len = diff.len(),
        "requesting ai review"
    );

    match backend.chat(&messages).await {
        Ok(raw) => clean_report(&raw),
        Err(e) => {
            error!(error = %e, "ai review failed");
            FAILED_REVIEW_REPORT.to_string()
        }
    }
}

/// Builds the fixed two-message review prompt.
pub fn build_messages(diff: &str, context_message: &str, tone: ReviewTone) -> Vec<ChatMessage> {
    let tone_phrase = match tone {
        ReviewTone::Professional => "professional, rigorous",
        ReviewTone::Friendly => "friendly, suggestion-oriented",
    };

    let system = format!(
        "You are an expert code reviewer. Review the provided code changes in detail, \
         focusing on:\n\n\
         1. **Code quality**: logic errors, performance problems, security vulnerabilities\n\
         2. **Coding conventions**: naming, code style, comment quality\n\
         3. **Architecture**: modularity, maintainability, extensibility\n\
         4. **Best practices**: adherence to language and framework idioms\n\n\
         Provide feedback in a {tone_phrase} tone, and end with a total score line \
         in the form `Score: <n>/10`."
    );

    let user = format!(
        "Please review the following code changes:\n\n\
         **Commit message**: {context_message}\n\n\
         **Changes**:\n\
         ```diff\n\
         {diff}\n\
         ```\n\n\
         Provide detailed review comments and improvement suggestions."
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Strips a single outer fenced-block wrapper from the raw response (bare
/// or `markdown`-tagged fence) and trims whitespace. An empty response
/// maps to the fixed empty-result text.
fn clean_report(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return EMPTY_RESPONSE_REPORT.to_string();
    }

    if let Some(inner) = trimmed
        .strip_prefix("```markdown")
        .and_then(|rest| rest.strip_suffix("```"))
    {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}
