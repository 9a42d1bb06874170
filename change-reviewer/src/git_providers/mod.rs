//! Origin facade w/o async-trait or dynamic trait objects.
//!
//! We expose an enum `OriginClient` with concrete implementations per
//! origin. This keeps async fns simple and avoids boxing futures. A
//! client is constructed per job from the immutable origins config; a
//! missing access token surfaces as a configuration-gap error before any
//! network call happens.

pub mod github;
pub mod gitlab;

use std::time::Duration;

use crate::{
    config::OriginsConfig,
    errors::{CrResult, Error, OriginError},
    events::{DiffSource, OriginKind, RequestRef},
};

/// Per-request timeout for every origin call.
const ORIGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Concrete origin client (enum-dispatch).
#[derive(Debug, Clone)]
pub enum OriginClient {
    GitHub(github::GitHubClient),
    GitLab(gitlab::GitLabClient),
}

impl OriginClient {
    /// Constructs the client matching the job's origin.
    ///
    /// # Errors
    /// [`OriginError::MissingToken`] when the origin's access token is not
    /// configured; HTTP client build failures map to [`OriginError`].
    pub fn from_config(origin: OriginKind, cfg: &OriginsConfig) -> CrResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("change-reviewer/0.1")
            .timeout(ORIGIN_TIMEOUT)
            .build()?;

        Ok(match origin {
            OriginKind::GitHub => {
                let token = cfg
                    .github_token
                    .clone()
                    .ok_or(OriginError::MissingToken("GITHUB_TOKEN"))?;
                Self::GitHub(github::GitHubClient::new(
                    http,
                    cfg.github_api_base.clone(),
                    token,
                ))
            }
            OriginKind::GitLab => {
                let token = cfg
                    .gitlab_token
                    .clone()
                    .ok_or(OriginError::MissingToken("GITLAB_TOKEN"))?;
                Self::GitLab(gitlab::GitLabClient::new(
                    http,
                    cfg.gitlab_api_base.clone(),
                    token,
                ))
            }
        })
    }

    /// Fetches the raw diff text for a source. The result may be empty;
    /// callers treat empty text as "nothing to review".
    pub async fn fetch_diff(&self, source: &DiffSource) -> CrResult<String> {
        match (self, source) {
            (Self::GitHub(c), DiffSource::GitHubPullRequest { diff_url }) => {
                c.fetch_pull_request_diff(diff_url).await
            }
            (Self::GitHub(c), DiffSource::GitHubCommit { api_url }) => {
                c.fetch_commit_diff(api_url).await
            }
            (Self::GitLab(c), DiffSource::GitLabMergeRequest { project_id, iid }) => {
                c.fetch_merge_request_changes(*project_id, *iid).await
            }
            (Self::GitLab(c), DiffSource::GitLabCommit { project_id, sha }) => {
                c.fetch_commit_diff(*project_id, sha).await
            }
            _ => Err(Error::Validation(
                "diff source does not match origin client".into(),
            )),
        }
    }

    /// Transitions the request to its closed state.
    pub async fn close_request(&self, request: &RequestRef) -> CrResult<()> {
        match (self, request) {
            (Self::GitHub(c), RequestRef::GitHubPullRequest { repo, number }) => {
                c.close_pull_request(repo, *number).await
            }
            (Self::GitLab(c), RequestRef::GitLabMergeRequest { project_id, iid }) => {
                c.close_merge_request(*project_id, *iid).await
            }
            _ => Err(Error::Validation(
                "request ref does not match origin client".into(),
            )),
        }
    }

    /// Posts the review as a comment on the request.
    pub async fn post_comment(&self, request: &RequestRef, body: &str) -> CrResult<()> {
        match (self, request) {
            (Self::GitHub(c), RequestRef::GitHubPullRequest { repo, number }) => {
                c.post_issue_comment(repo, *number, body).await
            }
            (Self::GitLab(c), RequestRef::GitLabMergeRequest { project_id, iid }) => {
                c.post_merge_request_note(*project_id, *iid, body).await
            }
            _ => Err(Error::Validation(
                "request ref does not match origin client".into(),
            )),
        }
    }
}
