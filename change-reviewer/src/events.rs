//! Inbound webhook classification and the normalized event model.
//!
//! GitHub and GitLab payloads are normalized here, early, into a single
//! internal [`ReviewJob`]; nothing downstream ever looks at raw webhook
//! JSON again. Unrecognized events (unknown kinds, uninteresting
//! actions, empty pushes) classify to `None` and are silently ignored;
//! the sender still gets its acknowledgment.
//!
//! Push events review only the **last** commit of the batch.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Origin system an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    GitHub,
    GitLab,
}

/// Where the diff text for a job comes from.
#[derive(Debug, Clone)]
pub enum DiffSource {
    /// Direct diff document fetch (single text blob).
    GitHubPullRequest { diff_url: String },
    /// Commit API document; per-file patches are concatenated.
    GitHubCommit { api_url: String },
    /// Merge-request changes document; per-file diffs are concatenated.
    GitLabMergeRequest { project_id: u64, iid: u64 },
    /// Commit document with an optional combined diff field.
    GitLabCommit { project_id: u64, sha: String },
}

/// The request resource remediation and comments act on.
///
/// Push events carry no request resource, so jobs built from them hold
/// no `RequestRef` and are never remediated.
#[derive(Debug, Clone)]
pub enum RequestRef {
    /// `repo` is "owner/name".
    GitHubPullRequest { repo: String, number: u64 },
    GitLabMergeRequest { project_id: u64, iid: u64 },
}

/// Event facts used when formatting the chat report.
#[derive(Debug, Clone)]
pub enum ReportContext {
    PullRequest {
        project: String,
        title: String,
        author: String,
        source_branch: String,
        target_branch: String,
        url: String,
    },
    MergeRequest {
        project: String,
        title: String,
        author: Option<String>,
        source_branch: String,
        target_branch: String,
        url: String,
    },
    Push {
        project: String,
        branch: String,
        committer: Option<String>,
        message: String,
    },
}

/// One normalized unit of review work, consumed by exactly one task.
#[derive(Debug, Clone)]
pub struct ReviewJob {
    pub origin: OriginKind,
    /// Project name used to resolve the chat-delivery target.
    pub project_name: String,
    /// Title or commit message embedded into the review prompt.
    pub context_message: String,
    pub source: DiffSource,
    pub request: Option<RequestRef>,
    pub report: ReportContext,
}

/// Classifies a GitHub webhook (`X-GitHub-Event` value + JSON body).
pub fn classify_github(event_type: &str, payload: &Value) -> Option<ReviewJob> {
    match event_type {
        "pull_request" => {
            let event: GitHubPullRequestEvent = parse_payload(payload)?;
            if !matches!(
                event.action.as_str(),
                "opened" | "synchronize" | "reopened"
            ) {
                debug!(action = %event.action, "ignoring pull_request action");
                return None;
            }

            let pr = event.pull_request;
            let repo = event.repository;
            Some(ReviewJob {
                origin: OriginKind::GitHub,
                project_name: repo.name,
                context_message: pr.title.clone(),
                source: DiffSource::GitHubPullRequest {
                    diff_url: pr.diff_url,
                },
                request: Some(RequestRef::GitHubPullRequest {
                    repo: repo.full_name.clone(),
                    number: pr.number,
                }),
                report: ReportContext::PullRequest {
                    project: repo.full_name,
                    title: pr.title,
                    author: pr.user.login,
                    source_branch: pr.head.branch,
                    target_branch: pr.base.branch,
                    url: pr.html_url,
                },
            })
        }
        "push" => {
            let event: GitHubPushEvent = parse_payload(payload)?;
            let last = event.commits.last()?.clone();

            Some(ReviewJob {
                origin: OriginKind::GitHub,
                project_name: event.repository.name,
                context_message: last.message.clone(),
                source: DiffSource::GitHubCommit { api_url: last.url },
                request: None,
                report: ReportContext::Push {
                    project: event.repository.full_name,
                    branch: branch_from_ref(event.git_ref.as_deref()),
                    committer: last.author.map(|a| a.name),
                    message: last.message,
                },
            })
        }
        other => {
            debug!(event = other, "ignoring unsupported GitHub event");
            None
        }
    }
}

/// Classifies a GitLab webhook by its `object_kind`.
pub fn classify_gitlab(payload: &Value) -> Option<ReviewJob> {
    let object_kind = payload.get("object_kind").and_then(Value::as_str)?;
    match object_kind {
        "merge_request" => {
            let event: GitLabMergeRequestEvent = parse_payload(payload)?;
            let action = event.object_attributes.action.as_deref().unwrap_or("");
            if !matches!(action, "open" | "update" | "reopen") {
                debug!(action, "ignoring merge_request action");
                return None;
            }

            let mr = event.object_attributes;
            let project = event.project;
            Some(ReviewJob {
                origin: OriginKind::GitLab,
                project_name: project.name.clone(),
                context_message: mr.title.clone(),
                source: DiffSource::GitLabMergeRequest {
                    project_id: project.id,
                    iid: mr.iid,
                },
                request: Some(RequestRef::GitLabMergeRequest {
                    project_id: project.id,
                    iid: mr.iid,
                }),
                report: ReportContext::MergeRequest {
                    project: project.name,
                    title: mr.title,
                    author: event.user.map(|u| u.name),
                    source_branch: mr.source_branch,
                    target_branch: mr.target_branch,
                    url: mr.url,
                },
            })
        }
        "push" => {
            let event: GitLabPushEvent = parse_payload(payload)?;
            let last = event.commits.last()?.clone();

            Some(ReviewJob {
                origin: OriginKind::GitLab,
                project_name: event.project.name.clone(),
                context_message: last.message.clone(),
                source: DiffSource::GitLabCommit {
                    project_id: event.project.id,
                    sha: last.id,
                },
                request: None,
                report: ReportContext::Push {
                    project: event.project.name,
                    branch: branch_from_ref(event.git_ref.as_deref()),
                    committer: last.author.map(|a| a.name),
                    message: last.message,
                },
            })
        }
        other => {
            debug!(object_kind = other, "ignoring unsupported GitLab event");
            None
        }
    }
}

fn parse_payload<T: for<'de> Deserialize<'de>>(payload: &Value) -> Option<T> {
    match serde_json::from_value(payload.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(error = %e, "payload did not match expected shape, ignoring");
            None
        }
    }
}

fn branch_from_ref(git_ref: Option<&str>) -> String {
    git_ref
        .map(|r| r.trim_start_matches("refs/heads/").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/* --- Webhook payload shapes (subset of fields we actually use) --- */

#[derive(Debug, Deserialize)]
struct GitHubPullRequestEvent {
    action: String,
    pull_request: GitHubPullRequest,
    repository: GitHubRepository,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    number: u64,
    title: String,
    html_url: String,
    diff_url: String,
    user: GitHubUser,
    head: GitHubGitRef,
    base: GitHubGitRef,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubGitRef {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPushEvent {
    #[serde(rename = "ref", default)]
    git_ref: Option<String>,
    repository: GitHubRepository,
    #[serde(default)]
    commits: Vec<GitHubPushCommit>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubPushCommit {
    message: String,
    url: String,
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommitAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitLabMergeRequestEvent {
    project: GitLabProject,
    object_attributes: GitLabMrAttributes,
    #[serde(default)]
    user: Option<GitLabUser>,
}

#[derive(Debug, Deserialize)]
struct GitLabProject {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitLabMrAttributes {
    iid: u64,
    title: String,
    url: String,
    source_branch: String,
    target_branch: String,
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitLabUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitLabPushEvent {
    #[serde(rename = "ref", default)]
    git_ref: Option<String>,
    project: GitLabProject,
    #[serde(default)]
    commits: Vec<GitLabPushCommit>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitLabPushCommit {
    id: String,
    message: String,
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn github_pr_payload(action: &str) -> Value {
        json!({
            "action": action,
            "pull_request": {
                "number": 12,
                "title": "Tighten parser bounds",
                "html_url": "https://github.com/acme/widget/pull/12",
                "diff_url": "https://github.com/acme/widget/pull/12.diff",
                "user": {"login": "octocat"},
                "head": {"ref": "fix/bounds"},
                "base": {"ref": "main"}
            },
            "repository": {
                "name": "widget",
                "full_name": "acme/widget"
            }
        })
    }

    #[test]
    fn github_pull_request_opened_is_recognized() {
        let job = classify_github("pull_request", &github_pr_payload("opened")).unwrap();
        assert_eq!(job.origin, OriginKind::GitHub);
        assert_eq!(job.project_name, "widget");
        assert!(matches!(
            job.source,
            DiffSource::GitHubPullRequest { ref diff_url }
                if diff_url.ends_with("12.diff")
        ));
        assert!(matches!(
            job.request,
            Some(RequestRef::GitHubPullRequest { ref repo, number: 12 })
                if repo == "acme/widget"
        ));
    }

    #[test]
    fn github_pull_request_closed_is_ignored() {
        assert!(classify_github("pull_request", &github_pr_payload("closed")).is_none());
    }

    #[test]
    fn github_unknown_event_is_ignored() {
        assert!(classify_github("issues", &json!({"action": "opened"})).is_none());
    }

    #[test]
    fn github_push_uses_last_commit() {
        let payload = json!({
            "ref": "refs/heads/main",
            "repository": {"name": "widget", "full_name": "acme/widget"},
            "commits": [
                {"message": "one", "url": "https://api.example/c1"},
                {"message": "two", "url": "https://api.example/c2"},
                {"message": "three", "url": "https://api.example/c3", "author": {"name": "Ada"}}
            ]
        });
        let job = classify_github("push", &payload).unwrap();
        assert_eq!(job.context_message, "three");
        assert!(matches!(
            job.source,
            DiffSource::GitHubCommit { ref api_url } if api_url.ends_with("/c3")
        ));
        assert!(job.request.is_none());
        assert!(matches!(
            job.report,
            ReportContext::Push { ref branch, .. } if branch == "main"
        ));
    }

    #[test]
    fn github_empty_push_is_ignored() {
        let payload = json!({
            "ref": "refs/heads/main",
            "repository": {"name": "widget", "full_name": "acme/widget"},
            "commits": []
        });
        assert!(classify_github("push", &payload).is_none());
    }

    #[test]
    fn gitlab_merge_request_open_is_recognized() {
        let payload = json!({
            "object_kind": "merge_request",
            "user": {"name": "Dev One"},
            "project": {"id": 42, "name": "demo"},
            "object_attributes": {
                "iid": 7,
                "title": "Add caching",
                "url": "https://gitlab.example.com/g/demo/-/merge_requests/7",
                "source_branch": "feat/cache",
                "target_branch": "main",
                "action": "open"
            }
        });
        let job = classify_gitlab(&payload).unwrap();
        assert_eq!(job.origin, OriginKind::GitLab);
        assert!(matches!(
            job.source,
            DiffSource::GitLabMergeRequest { project_id: 42, iid: 7 }
        ));
        assert!(matches!(
            job.request,
            Some(RequestRef::GitLabMergeRequest { project_id: 42, iid: 7 })
        ));
    }

    #[test]
    fn gitlab_merge_request_merge_action_is_ignored() {
        let payload = json!({
            "object_kind": "merge_request",
            "project": {"id": 42, "name": "demo"},
            "object_attributes": {
                "iid": 7,
                "title": "Add caching",
                "url": "https://gitlab.example.com/mr/7",
                "source_branch": "feat",
                "target_branch": "main",
                "action": "merge"
            }
        });
        assert!(classify_gitlab(&payload).is_none());
    }

    #[test]
    fn gitlab_push_uses_last_commit_sha() {
        let payload = json!({
            "object_kind": "push",
            "ref": "refs/heads/dev",
            "project": {"id": 42, "name": "demo"},
            "commits": [
                {"id": "aaa111", "message": "first"},
                {"id": "bbb222", "message": "second", "author": {"name": "Lin"}}
            ]
        });
        let job = classify_gitlab(&payload).unwrap();
        assert!(matches!(
            job.source,
            DiffSource::GitLabCommit { project_id: 42, ref sha } if sha == "bbb222"
        ));
        assert_eq!(job.context_message, "second");
    }
}
