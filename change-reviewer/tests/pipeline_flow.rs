//! End-to-end pipeline tests against mocked origin, AI, and chat endpoints.

use std::{collections::HashMap, sync::Arc};

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use ai_llm_service::{LlmModelConfig, LlmProvider};
use change_reviewer::{
    config::{OriginsConfig, PipelineConfig, ReviewConfig, ReviewTone, WecomConfig},
    events::classify_gitlab,
    notify::{MessageKind, WecomNotifier},
    run_review_job,
};

fn test_config(
    origin_base: &str,
    llm_base: &str,
    webhook_url: Option<String>,
    min_score: f64,
) -> PipelineConfig {
    PipelineConfig {
        origins: OriginsConfig {
            gitlab_api_base: origin_base.to_string(),
            gitlab_token: Some("glpat-test".into()),
            github_api_base: origin_base.to_string(),
            github_token: Some("ghp-test".into()),
        },
        llm: LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-3.5-turbo".into(),
            endpoint: llm_base.to_string(),
            api_key: Some("sk-test".into()),
            max_tokens: Some(2000),
            temperature: Some(0.3),
            timeout_secs: Some(5),
        },
        review: ReviewConfig {
            max_tokens: 10_000,
            tone: ReviewTone::Professional,
            min_score,
        },
        wecom: WecomConfig {
            enabled: true,
            default_webhook_url: webhook_url,
            project_webhook_urls: HashMap::new(),
        },
    }
}

fn merge_request_payload() -> Value {
    json!({
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
    })
}

fn completion_response(content: &str) -> Value {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

fn chat_content(request: &wiremock::Request) -> String {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    body["markdown"]["content"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn low_score_merge_request_is_closed_commented_and_notified() -> anyhow::Result<()> {
    let origin = MockServer::start().await;
    let llm = MockServer::start().await;
    let chat = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/merge_requests/7/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changes": [
                {"diff": "--- a/src/cache.rs\n+++ b/src/cache.rs\n@@ -1 +1,2 @@\n fn get() {}\n+fn put() { unimplemented!() }\n"},
                {"diff": "--- a/src/lib.rs\n+++ b/src/lib.rs\n@@ -1 +1 @@\n-mod old;\n+mod cache;\n"}
            ]
        })))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response(
            "The new cache entry point panics unconditionally.\n\n总分：3/10",
        )))
        .expect(1)
        .mount(&llm)
        .await;

    Mock::given(method("PUT"))
        .and(path("/projects/42/merge_requests/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "closed"})))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/42/merge_requests/7/notes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(1)
        .mount(&chat)
        .await;

    let cfg = Arc::new(test_config(
        &origin.uri(),
        &llm.uri(),
        Some(format!("{}/send", chat.uri())),
        6.0,
    ));
    let job = classify_gitlab(&merge_request_payload()).expect("recognized event");

    run_review_job(cfg, job).await?;

    // The posted note carries the report and the low-score warning.
    let origin_requests = origin.received_requests().await.unwrap();
    let note = origin_requests
        .iter()
        .find(|r| r.url.path().ends_with("/notes"))
        .expect("note request");
    let note_body: Value = serde_json::from_slice(&note.body).unwrap();
    let note_text = note_body["body"].as_str().unwrap();
    assert!(note_text.contains("总分：3/10"));
    assert!(note_text.contains("closed automatically"));

    // The chat message marks the merge request as auto-closed.
    let chat_requests = chat.received_requests().await.unwrap();
    let content = chat_content(&chat_requests[0]);
    assert!(content.contains("Merge Request"));
    assert!(content.contains("closed automatically"));

    Ok(())
}

#[tokio::test]
async fn passing_score_keeps_request_open_but_still_comments() -> anyhow::Result<()> {
    let origin = MockServer::start().await;
    let llm = MockServer::start().await;
    let chat = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/merge_requests/7/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changes": [{"diff": "@@ -1 +1 @@\n-a\n+b\n"}]
        })))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_response("Clean change. Score: 9/10")),
        )
        .expect(1)
        .mount(&llm)
        .await;

    // No close call may happen.
    Mock::given(method("PUT"))
        .and(path("/projects/42/merge_requests/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/42/merge_requests/7/notes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(1)
        .mount(&chat)
        .await;

    let cfg = Arc::new(test_config(
        &origin.uri(),
        &llm.uri(),
        Some(format!("{}/send", chat.uri())),
        6.0,
    ));
    let job = classify_gitlab(&merge_request_payload()).expect("recognized event");

    run_review_job(cfg, job).await?;

    let origin_requests = origin.received_requests().await.unwrap();
    let note = origin_requests
        .iter()
        .find(|r| r.url.path().ends_with("/notes"))
        .expect("note request");
    let note_body: Value = serde_json::from_slice(&note.body).unwrap();
    assert!(!note_body["body"].as_str().unwrap().contains("closed automatically"));

    Ok(())
}

#[tokio::test]
async fn push_event_reviews_only_the_last_commit() -> anyhow::Result<()> {
    let origin = MockServer::start().await;
    let llm = MockServer::start().await;
    let chat = MockServer::start().await;

    // Only the last commit of the batch may be fetched.
    Mock::given(method("GET"))
        .and(path("/projects/42/repository/commits/c3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c3",
            "diff": "@@ -1 +1 @@\n-x\n+y\n"
        })))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_response("Fine. Score: 8/10")),
        )
        .expect(1)
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(1)
        .mount(&chat)
        .await;

    let payload = json!({
        "object_kind": "push",
        "ref": "refs/heads/main",
        "project": {"id": 42, "name": "demo"},
        "commits": [
            {"id": "c1", "message": "first"},
            {"id": "c2", "message": "second"},
            {"id": "c3", "message": "third", "author": {"name": "Lin"}}
        ]
    });
    let cfg = Arc::new(test_config(
        &origin.uri(),
        &llm.uri(),
        Some(format!("{}/send", chat.uri())),
        6.0,
    ));
    let job = classify_gitlab(&payload).expect("recognized event");

    run_review_job(cfg, job).await?;

    // Pushes carry no request resource: nothing was closed or commented.
    let origin_requests = origin.received_requests().await.unwrap();
    assert_eq!(origin_requests.len(), 1);
    assert_eq!(
        origin_requests[0].url.path(),
        "/projects/42/repository/commits/c3"
    );

    let chat_requests = chat.received_requests().await.unwrap();
    assert!(chat_content(&chat_requests[0]).contains("third"));

    Ok(())
}

#[tokio::test]
async fn empty_diff_short_circuits_without_ai_or_notification() -> anyhow::Result<()> {
    let origin = MockServer::start().await;
    let llm = MockServer::start().await;
    let chat = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/merge_requests/7/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changes": [{"diff": ""}, {"diff": "  "}]
        })))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response("unused")))
        .expect(0)
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0})))
        .expect(0)
        .mount(&chat)
        .await;

    let cfg = Arc::new(test_config(
        &origin.uri(),
        &llm.uri(),
        Some(format!("{}/send", chat.uri())),
        6.0,
    ));
    let job = classify_gitlab(&merge_request_payload()).expect("recognized event");

    run_review_job(cfg, job).await?;

    Ok(())
}

#[tokio::test]
async fn plain_text_report_within_limit_is_sent_as_one_message() -> anyhow::Result<()> {
    let chat = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(1)
        .mount(&chat)
        .await;

    let wecom = WecomConfig {
        enabled: true,
        default_webhook_url: Some(format!("{}/send", chat.uri())),
        project_webhook_urls: HashMap::new(),
    };
    let notifier = WecomNotifier::new(wecom).unwrap();

    notifier
        .send_report("review pipeline deployed", "demo", MessageKind::Text)
        .await?;

    let requests = chat.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["msgtype"], "text");
    assert_eq!(body["text"]["content"], "review pipeline deployed");

    Ok(())
}

#[tokio::test]
async fn oversized_report_is_chunked_in_order_with_markers() -> anyhow::Result<()> {
    let chat = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(3)
        .mount(&chat)
        .await;

    let wecom = WecomConfig {
        enabled: true,
        default_webhook_url: Some(format!("{}/send", chat.uri())),
        project_webhook_urls: HashMap::new(),
    };
    let notifier = WecomNotifier::new(wecom).unwrap();

    // 100 lines of 90 bytes: 9000 bytes against the 4096-byte markdown
    // limit gives ceil(9000/4096) = 3 parts.
    let content: String = std::iter::repeat_n("x".repeat(89) + "\n", 100).collect();
    assert_eq!(content.len(), 9000);

    notifier
        .send_report(&content, "demo", MessageKind::Markdown)
        .await?;

    let requests = chat.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    for (i, request) in requests.iter().enumerate() {
        let content = chat_content(request);
        assert!(content.starts_with(&format!(
            "## Code review report (part {} of 3)",
            i + 1
        )));
    }

    Ok(())
}
