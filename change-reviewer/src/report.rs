//! Chat-report formatting for the supported event kinds.

use crate::events::ReportContext;

/// Renders the markdown report delivered to the chat channel. When the
/// originating request was auto-closed, the header block says so.
pub fn format_report(ctx: &ReportContext, review: &str, auto_closed: bool) -> String {
    match ctx {
        ReportContext::PullRequest {
            project,
            title,
            author,
            source_branch,
            target_branch,
            url,
        } => {
            let status = status_line(auto_closed);
            format!(
                "## 🔍 Code Review Report - Pull Request\n\n\
                 **Project**: {project}\n\
                 **Title**: {title}\n\
                 **Author**: {author}\n\
                 **Branch**: {source_branch} → {target_branch}\n\
                 **Link**: {url}\n\
                 {status}\
                 \n### 📋 Review Result\n{review}"
            )
        }
        ReportContext::MergeRequest {
            project,
            title,
            author,
            source_branch,
            target_branch,
            url,
        } => {
            let author = author.as_deref().unwrap_or("Unknown");
            let status = status_line(auto_closed);
            format!(
                "## 🔍 Code Review Report - Merge Request\n\n\
                 **Project**: {project}\n\
                 **Title**: {title}\n\
                 **Author**: {author}\n\
                 **Branch**: {source_branch} → {target_branch}\n\
                 **Link**: {url}\n\
                 {status}\
                 \n### 📋 Review Result\n{review}"
            )
        }
        ReportContext::Push {
            project,
            branch,
            committer,
            message,
        } => {
            let committer = committer.as_deref().unwrap_or("Unknown");
            format!(
                "## 🔍 Code Review Report - Push\n\n\
                 **Project**: {project}\n\
                 **Branch**: {branch}\n\
                 **Committer**: {committer}\n\
                 **Commit message**: {message}\n\
                 \n### 📋 Review Result\n{review}"
            )
        }
    }
}

fn status_line(auto_closed: bool) -> &'static str {
    if auto_closed {
        "**Status**: ⛔ closed automatically (score below minimum)\n"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mr_context() -> ReportContext {
        ReportContext::MergeRequest {
            project: "demo".into(),
            title: "Add caching".into(),
            author: None,
            source_branch: "feat".into(),
            target_branch: "main".into(),
            url: "https://gitlab.example.com/mr/7".into(),
        }
    }

    #[test]
    fn merge_request_report_has_header_and_review() {
        let out = format_report(&mr_context(), "Looks fine.", false);
        assert!(out.contains("Merge Request"));
        assert!(out.contains("**Author**: Unknown"));
        assert!(out.contains("feat → main"));
        assert!(out.contains("Looks fine."));
        assert!(!out.contains("closed automatically"));
    }

    #[test]
    fn auto_closed_report_carries_status_line() {
        let out = format_report(&mr_context(), "Needs work.", true);
        assert!(out.contains("closed automatically"));
    }
}
