use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use change_reviewer::events::{classify_github, classify_gitlab};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

/// Fixed acknowledgment body; senders never see downstream outcomes.
#[derive(Serialize)]
pub struct WebhookAck {
    pub message: &'static str,
}

/// POST /webhook
///
/// Classifies the inbound event (GitHub by the `X-GitHub-Event` header,
/// GitLab by `object_kind`) and spawns one detached review task per
/// recognized event. The response is sent immediately: either the fixed
/// acknowledgment, or a 400 when the body is empty or not JSON.
/// Unrecognized kinds and actions are acknowledged and ignored.
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return ApiResponse::<()>::error("BAD_REQUEST", "Empty request body.")
            .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return ApiResponse::<()>::error("BAD_REQUEST", format!("Invalid JSON: {e}"))
                .into_response_with_status(StatusCode::BAD_REQUEST);
        }
    };

    let job = match headers.get("x-github-event").and_then(|v| v.to_str().ok()) {
        Some(event_type) => {
            info!(event = event_type, "received GitHub event");
            classify_github(event_type, &payload)
        }
        None => {
            let object_kind = payload
                .get("object_kind")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            info!(object_kind, "received GitLab event");
            classify_gitlab(&payload)
        }
    };

    if let Some(job) = job {
        let cfg = state.config.clone();
        // Fire-and-forget: the error channel of the task drains into the
        // log; the sender has already been acknowledged.
        tokio::spawn(async move {
            if let Err(e) = change_reviewer::run_review_job(cfg, job).await {
                error!(error = %e, "review pipeline failed");
            }
        });
    }

    ApiResponse::success(WebhookAck {
        message: "request received, processing asynchronously",
    })
    .into_response_with_status(StatusCode::OK)
}
