//! GitLab origin (REST v4) for diff retrieval and MR remediation.
//!
//! Endpoints used:
//! - GET /projects/:id/merge_requests/:iid/changes   (per-file diffs)
//! - GET /projects/:id/repository/commits/:sha       (combined diff field)
//! - PUT /projects/:id/merge_requests/:iid           (state_event=close)
//! - POST /projects/:id/merge_requests/:iid/notes    (review comment)

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::errors::CrResult;

#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    base_api: String, // e.g. "https://gitlab.com/api/v4"
    token: String,    // "PRIVATE-TOKEN"
}

impl GitLabClient {
    /// Constructs a GitLab client with a shared reqwest instance and auth token.
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        Self {
            http,
            base_api,
            token,
        }
    }

    /// Fetches the merge-request changes document and concatenates the
    /// per-file diffs with a single newline, in origin order.
    pub async fn fetch_merge_request_changes(
        &self,
        project_id: u64,
        iid: u64,
    ) -> CrResult<String> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/changes",
            self.base_api, project_id, iid
        );
        debug!(%url, "GET merge request changes");

        let resp: GitLabMrChanges = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let diff = resp
            .changes
            .into_iter()
            .filter_map(|c| c.diff)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(diff)
    }

    /// Fetches a single commit document. The combined `diff` field is
    /// optional; when absent the result is empty and the caller treats it
    /// as "nothing to review".
    pub async fn fetch_commit_diff(&self, project_id: u64, sha: &str) -> CrResult<String> {
        let url = format!(
            "{}/projects/{}/repository/commits/{}",
            self.base_api, project_id, sha
        );
        debug!(%url, "GET commit");

        let resp: GitLabCommit = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.diff.unwrap_or_default())
    }

    /// Transitions the merge request to its closed state.
    pub async fn close_merge_request(&self, project_id: u64, iid: u64) -> CrResult<()> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}",
            self.base_api, project_id, iid
        );
        debug!(%url, "PUT state_event=close");

        self.http
            .put(url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&json!({ "state_event": "close" }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Posts a note (comment) on the merge request.
    pub async fn post_merge_request_note(
        &self,
        project_id: u64,
        iid: u64,
        body: &str,
    ) -> CrResult<()> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/notes",
            self.base_api, project_id, iid
        );
        debug!(%url, "POST note");

        self.http
            .post(url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&json!({ "body": body }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/* --- GitLab response shapes (subset of fields we actually use) --- */

#[derive(Debug, Deserialize)]
struct GitLabMrChanges {
    #[serde(default)]
    changes: Vec<GitLabChange>,
}

#[derive(Debug, Deserialize)]
struct GitLabChange {
    #[serde(default)]
    diff: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitLabCommit {
    #[serde(default)]
    diff: Option<String>,
}
