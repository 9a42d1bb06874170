//! GitHub origin for diff retrieval and PR remediation.
//!
//! Diff URLs for pull requests and commits arrive in the webhook payload
//! and are fetched as-is; remediation and comments go through the
//! configured API base:
//! - GET {diff_url} with `Accept: application/vnd.github.v3.diff`
//! - GET {commit_url} with `Accept: application/vnd.github.v3+json`
//!   (per-file `patch` fields concatenated)
//! - PATCH /repos/{owner}/{repo}/pulls/{number}      (state=closed)
//! - POST /repos/{owner}/{repo}/issues/{number}/comments

use reqwest::{Client, header};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::errors::CrResult;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // e.g. "https://api.github.com"
    token: String,
}

impl GitHubClient {
    /// Constructs a GitHub client with a shared reqwest instance and auth token.
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        Self {
            http,
            base_api,
            token,
        }
    }

    /// Fetches the pull-request diff document as a single text blob.
    pub async fn fetch_pull_request_diff(&self, diff_url: &str) -> CrResult<String> {
        debug!(url = diff_url, "GET pull request diff");

        let text = self
            .http
            .get(diff_url)
            .header(header::ACCEPT, "application/vnd.github.v3.diff")
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(text)
    }

    /// Fetches a commit document and concatenates the per-file patches
    /// with a single newline, in origin order. Files without a textual
    /// patch (binary, too large) are skipped.
    pub async fn fetch_commit_diff(&self, commit_url: &str) -> CrResult<String> {
        debug!(url = commit_url, "GET commit");

        let resp: GitHubCommit = self
            .http
            .get(commit_url)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let diff = resp
            .files
            .into_iter()
            .filter_map(|f| f.patch)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(diff)
    }

    /// Transitions the pull request to its closed state.
    pub async fn close_pull_request(&self, repo: &str, number: u64) -> CrResult<()> {
        let url = format!("{}/repos/{}/pulls/{}", self.base_api, repo, number);
        debug!(%url, "PATCH state=closed");

        self.http
            .patch(url)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::AUTHORIZATION, self.auth_header())
            .json(&json!({ "state": "closed" }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Posts the review as an issue comment on the pull request.
    pub async fn post_issue_comment(&self, repo: &str, number: u64, body: &str) -> CrResult<()> {
        let url = format!("{}/repos/{}/issues/{}/comments", self.base_api, repo, number);
        debug!(%url, "POST comment");

        self.http
            .post(url)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::AUTHORIZATION, self.auth_header())
            .json(&json!({ "body": body }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }
}

/* --- GitHub response shapes (subset of fields we actually use) --- */

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    #[serde(default)]
    files: Vec<GitHubCommitFile>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitFile {
    #[serde(default)]
    patch: Option<String>,
}
