//! Score gating: decide whether a request should be closed automatically.

/// Deterministic gating outcome for one review.
#[derive(Debug, Clone, Copy)]
pub struct GatingDecision {
    pub should_remediate: bool,
    pub threshold: f64,
}

/// A request is remediated only when a score was actually extracted and
/// lies strictly below the configured minimum. A missing score never
/// triggers remediation.
pub fn decide(score: Option<f64>, threshold: f64) -> GatingDecision {
    GatingDecision {
        should_remediate: matches!(score, Some(s) if s < threshold),
        threshold,
    }
}

/// Notice appended to the review comment when the request was closed.
const AUTO_CLOSE_NOTICE: &str =
    "⚠️ The quality score is below the configured minimum; this request was closed automatically. \
     Please address the findings above and reopen.";

/// Builds the comment body posted on the request: the report itself,
/// plus the auto-close notice after a separator when remediation ran.
pub fn comment_body(report: &str, auto_closed: bool) -> String {
    if auto_closed {
        format!("{report}\n\n---\n{AUTO_CLOSE_NOTICE}")
    } else {
        report.to_string()
    }
}
