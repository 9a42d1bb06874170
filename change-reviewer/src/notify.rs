//! Chat-webhook delivery with size-limited chunking.
//!
//! Reports go to a WeCom-style group-robot webhook. Markdown messages
//! are capped at 4096 bytes and plain text at 2048, measured after the
//! markdown normalization the destination applies its limits to. Content
//! over the limit is split into ordered chunks at newline boundaries
//! where possible, each delivered with a "part i of N" marker and a
//! fixed pause between sends. Delivery is best-effort: failures are the
//! caller's to log, never retried here.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::{
    config::WecomConfig,
    errors::{CrResult, NotifyError},
};

/// Pause between consecutive chunk sends.
const CHUNK_DELAY: Duration = Duration::from_secs(1);

/// Per-request timeout for webhook delivery.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Message kind, which decides rendering and the destination byte limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Markdown,
    Text,
}

impl MessageKind {
    fn byte_limit(self) -> usize {
        match self {
            Self::Markdown => 4096,
            Self::Text => 2048,
        }
    }

    fn msgtype(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }
}

lazy_static! {
    static ref DEEP_HEADING: Regex = Regex::new(r"#{5,}\s").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// WeCom-style webhook notifier. Holds the resolved delivery table and a
/// preconfigured HTTP client.
#[derive(Debug, Clone)]
pub struct WecomNotifier {
    http: reqwest::Client,
    cfg: WecomConfig,
}

impl WecomNotifier {
    pub fn new(cfg: WecomConfig) -> CrResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(NotifyError::from)?;
        Ok(Self { http, cfg })
    }

    /// Delivers a report to the project's chat channel.
    ///
    /// Skips silently when delivery is disabled or no endpoint resolves
    /// for the project; notification is optional infrastructure.
    pub async fn send_report(
        &self,
        content: &str,
        project_name: &str,
        kind: MessageKind,
    ) -> Result<(), NotifyError> {
        if !self.cfg.enabled {
            debug!("chat delivery disabled, skipping notification");
            return Ok(());
        }
        let Some(url) = self.cfg.webhook_for(project_name) else {
            warn!(
                project = project_name,
                "no webhook configured, skipping notification"
            );
            return Ok(());
        };

        let rendered = match kind {
            MessageKind::Markdown => normalize_markdown(content),
            MessageKind::Text => content.to_string(),
        };

        let limit = kind.byte_limit();
        if rendered.len() <= limit {
            return self.send_single(url, &rendered, kind).await;
        }

        let chunks = split_content(&rendered, limit);
        warn!(
            bytes = rendered.len(),
            parts = chunks.len(),
            "report exceeds message limit, sending in chunks"
        );

        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            let marker = format!("Code review report (part {} of {})", i + 1, total);
            let body = match kind {
                MessageKind::Markdown => format!("## {marker}\n\n{chunk}"),
                MessageKind::Text => format!("{marker}\n\n{chunk}"),
            };
            self.send_single(url, &body, kind).await?;

            if i + 1 < total {
                tokio::time::sleep(CHUNK_DELAY).await;
            }
        }

        Ok(())
    }

    async fn send_single(
        &self,
        url: &str,
        content: &str,
        kind: MessageKind,
    ) -> Result<(), NotifyError> {
        let payload = match kind {
            MessageKind::Markdown => json!({
                "msgtype": "markdown",
                "markdown": { "content": content }
            }),
            MessageKind::Text => json!({
                "msgtype": "text",
                "text": { "content": content }
            }),
        };

        let resp = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let ack: WebhookAck = resp
            .json()
            .await
            .map_err(|e| NotifyError::Decode(e.to_string()))?;

        if ack.errcode != 0 {
            // Application-level rejection; delivery already happened at
            // the transport level, so this is logged, not raised.
            error!(
                errcode = ack.errcode,
                errmsg = %ack.errmsg,
                "chat webhook rejected message"
            );
        } else {
            info!(msgtype = kind.msgtype(), "chat message delivered");
        }

        Ok(())
    }
}

/// Applies the destination's markdown constraints before measurement:
/// headings deeper than level 4 collapse to level 4, inline HTML tags are
/// stripped.
pub fn normalize_markdown(content: &str) -> String {
    let collapsed = DEEP_HEADING.replace_all(content, "#### ");
    HTML_TAG.replace_all(&collapsed, "").into_owned()
}

/// Splits content into chunks of at most `max_bytes` bytes.
///
/// The split point is pulled back to just after the last newline strictly
/// inside the window when one exists; otherwise the cut lands on the
/// byte limit, adjusted backwards only as far as the nearest UTF-8
/// character boundary. Concatenating the chunks reproduces the input
/// exactly.
pub fn split_content(content: &str, max_bytes: usize) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        let mut end = usize::min(start + max_bytes, bytes.len());

        if end < bytes.len() {
            if let Some(nl) = bytes[start..end].iter().rposition(|&b| b == b'\n') {
                end = start + nl + 1;
            } else {
                while end > start && !content.is_char_boundary(end) {
                    end -= 1;
                }
                if end == start {
                    // Window smaller than one character; take it whole to
                    // guarantee progress.
                    end = usize::min(start + max_bytes.max(4), bytes.len());
                    while end < bytes.len() && !content.is_char_boundary(end) {
                        end += 1;
                    }
                }
            }
        }

        chunks.push(&content[start..end]);
        start = end;
    }

    chunks
}

#[derive(Debug, Deserialize)]
struct WebhookAck {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}
