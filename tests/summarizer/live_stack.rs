use dailycall::core::agent::{Summarizer, SummarizerOptions};
use dailycall::core::mail::{GmailCredentials, GmailSource};
use dailycall::core::providers::GeminiProvider;
use dailycall::error::{SourceError, SummarizeError};
use dailycall::runtime::observability::NoopObserver;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn summary(unread_count: u32, important: usize) -> serde_json::Value {
    let important: Vec<serde_json::Value> = (0..important)
        .map(|i| {
            json!({
                "from": format!("sender{i}@example.com"),
                "subject": format!("Subject {i}"),
                "whyImportant": "Needs a decision today",
                "suggestedAction": "Reply with approval"
            })
        })
        .collect();
    json!({
        "unreadCount": unread_count,
        "headline": "Two things need you today",
        "important": important,
        "quickHits": [
            {"from": "news@example.com", "subject": "Digest", "oneLine": "Weekly roundup"}
        ],
        "speakable": "Good morning. Two things need your attention."
    })
}

fn gemini_call(name: &str, args: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"functionCall": {"name": name, "args": args}}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 10}
    })
}

fn message_detail(from: &str, subject: &str) -> serde_json::Value {
    json!({
        "id": "ignored",
        "snippet": format!("{subject} snippet"),
        "payload": {"headers": [
            {"name": "From", "value": from},
            {"name": "Subject", "value": subject},
            {"name": "Date", "value": "Mon, 19 Oct 2026 06:00:00 +0000"}
        ]}
    })
}

async fn mount_gmail(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .and(query_param("q", "is:unread newer_than:2d"))
        .and(query_param("maxResults", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "a", "threadId": "t1"}, {"id": "b", "threadId": "t2"}]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(message_detail("CFO <cfo@corp.com>", "Budget")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(message_detail("Team <team@corp.com>", "Standup")),
        )
        .mount(server)
        .await;
}

fn gmail(server: &MockServer) -> Arc<GmailSource> {
    Arc::new(
        GmailSource::new(
            reqwest::Client::new(),
            GmailCredentials {
                client_id: "client".into(),
                client_secret: "secret".into(),
                refresh_token: "1//refresh".into(),
            },
        )
        .with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/gmail/v1", server.uri()),
        ),
    )
}

fn gemini_summarizer(server: &MockServer) -> Summarizer {
    let provider =
        GeminiProvider::new(Some("test-key")).with_base_url(format!("{}/v1beta", server.uri()));
    Summarizer::new(
        Arc::new(provider),
        Arc::new(NoopObserver),
        SummarizerOptions::default(),
    )
}

#[tokio::test]
async fn gemini_and_gmail_produce_a_summary() {
    let server = MockServer::start().await;
    mount_gmail(&server).await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_call("getUnreadEmails", json!({}))))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("functionResponse"))
        .and(body_string_contains("Budget"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_call("submitSummary", summary(2, 1))))
        .expect(1)
        .mount(&server)
        .await;

    let result = gemini_summarizer(&server)
        .summarize(gmail(&server))
        .await
        .unwrap();

    assert_eq!(result.unread_count, 2);
    assert_eq!(result.important.len(), 1);
}

#[tokio::test]
async fn rejected_refresh_token_is_source_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_call("getUnreadEmails", json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let err = gemini_summarizer(&server)
        .summarize(gmail(&server))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SummarizeError::SourceUnavailable(SourceError::CredentialsRejected(_))
    ));
}

#[tokio::test]
async fn gemini_outage_aborts_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gemini_summarizer(&server)
        .summarize(gmail(&server))
        .await
        .unwrap_err();

    match err {
        SummarizeError::Backend(inner) => assert!(inner.to_string().contains("503")),
        other => panic!("expected backend error, got {other:?}"),
    }
}
