//! Review pipeline for source-control change events.
//!
//! One public entry runs the whole pipeline for a normalized event:
//!
//! 1) **Fetch** — origin client retrieves the raw diff text
//!    (PR diff blob / commit patches / MR changes / commit diff field).
//! 2) **Truncate** — bound the diff to the configured token budget.
//! 3) **Review** — build the prompt, invoke the configured AI backend,
//!    post-process the response (never fails; degrades to fixed text).
//! 4) **Score & gate** — extract a numeric score, close the request when
//!    it falls below the configured minimum, post the review comment.
//! 5) **Notify** — format the report and deliver it to the chat channel,
//!    chunked when oversized.
//!
//! Empty diffs short-circuit after step 1: no AI call, no notification.
//! Each event runs in its own detached task; failures abort only that
//! task. The pipeline uses `tracing` for step logging and avoids
//! `async-trait` and heap trait objects; provider and backend dispatch
//! are enum-based.

pub mod config;
pub mod errors;
pub mod events;
pub mod gate;
pub mod git_providers;
pub mod notify;
pub mod report;
pub mod reviewer;
pub mod score;
pub mod truncate;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use config::PipelineConfig;
use errors::CrResult;
use events::ReviewJob;
use git_providers::OriginClient;
use notify::{MessageKind, WecomNotifier};

/// Runs the full review pipeline for one normalized event.
///
/// Steps are strictly sequential; every external call is independently
/// time-bounded. Fetch failures abort the job; AI failures degrade to a
/// fallback report; remediation and comment failures are logged and do
/// not block notification.
pub async fn run_review_job(cfg: Arc<PipelineConfig>, job: ReviewJob) -> CrResult<()> {
    let t0 = Instant::now();

    debug!(origin = ?job.origin, project = %job.project_name, "pipeline: init origin client");
    let origin = OriginClient::from_config(job.origin, &cfg.origins)?;

    debug!("pipeline: fetch diff");
    let diff = origin.fetch_diff(&job.source).await?;
    if diff.trim().is_empty() {
        info!(project = %job.project_name, "empty diff, nothing to review");
        return Ok(());
    }

    debug!(bytes = diff.len(), "pipeline: truncate to token budget");
    let truncated = truncate::truncate_to_budget(&diff, cfg.review.max_tokens);

    let review = reviewer::review_diff(
        &cfg.llm,
        &truncated,
        &job.context_message,
        cfg.review.tone,
    )
    .await;

    let score = score::extract_score(&review);
    let decision = gate::decide(score, cfg.review.min_score);
    debug!(
        score = ?score,
        threshold = decision.threshold,
        remediate = decision.should_remediate,
        "pipeline: gating decision"
    );

    let mut auto_closed = false;
    if let Some(request) = &job.request {
        if decision.should_remediate {
            match origin.close_request(request).await {
                Ok(()) => {
                    auto_closed = true;
                    info!(
                        project = %job.project_name,
                        score = ?score,
                        threshold = decision.threshold,
                        "request closed automatically due to low score"
                    );
                }
                Err(e) => error!(error = %e, "failed to close request"),
            }
        }

        let comment = gate::comment_body(&review, auto_closed);
        if let Err(e) = origin.post_comment(request, &comment).await {
            error!(error = %e, "failed to post review comment");
        }
    }

    let message = report::format_report(&job.report, &review, auto_closed);
    let notifier = WecomNotifier::new(cfg.wecom.clone())?;
    if let Err(e) = notifier
        .send_report(&message, &job.project_name, MessageKind::Markdown)
        .await
    {
        error!(error = %e, "chat notification failed");
    }

    info!(
        project = %job.project_name,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "pipeline: review complete"
    );

    Ok(())
}
