use dailycall::core::mail::{EmailSource, GmailCredentials, GmailSource};
use dailycall::error::SourceError;
use serde_json::json;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer) -> GmailSource {
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
        format!("{}/gmail/v1/", server.uri()),
    )
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "ya29.abc"})),
        )
        .mount(server)
        .await;
}

fn detail(headers: serde_json::Value, snippet: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "snippet": snippet,
        "payload": {"headers": headers}
    }))
}

#[tokio::test]
async fn fetch_keeps_list_order_and_maps_headers() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .and(header("authorization", "Bearer ya29.abc"))
        .and(query_param("q", "is:unread"))
        .and(query_param("maxResults", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "z"}, {"id": "a"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/z"))
        .and(query_param("format", "metadata"))
        .respond_with(detail(
            json!([
                {"name": "from", "value": "Zed <z@example.com>"},
                {"name": "subject", "value": "Last alphabetically"}
            ]),
            "zzz",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/a"))
        .respond_with(detail(
            json!([
                {"name": "From", "value": "Ann <a@example.com>"},
                {"name": "Subject", "value": "First alphabetically"},
                {"name": "Date", "value": "Mon, 19 Oct 2026 05:00:00 +0000"}
            ]),
            "aaa",
        ))
        .mount(&server)
        .await;

    let emails = source(&server).fetch("is:unread", 5).await.unwrap();

    let ids: Vec<&str> = emails.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a"]);
    assert_eq!(emails[0].from, "Zed <z@example.com>");
    assert_eq!(emails[0].date, "");
    assert_eq!(emails[1].subject, "First alphabetically");
    assert_eq!(emails[1].snippet, "aaa");
}

#[tokio::test]
async fn empty_mailbox_returns_no_messages() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultSizeEstimate": 0})))
        .mount(&server)
        .await;

    let emails = source(&server).fetch("is:unread", 15).await.unwrap();
    assert!(emails.is_empty());
}

#[tokio::test]
async fn oversized_listing_is_truncated() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "1"}, {"id": "2"}, {"id": "3"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/gmail/v1/users/me/messages/.+$"))
        .respond_with(detail(json!([]), "body"))
        .mount(&server)
        .await;

    let emails = source(&server).fetch("is:unread", 2).await.unwrap();
    assert_eq!(emails.len(), 2);
}

#[tokio::test]
async fn vanished_message_is_skipped() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "gone"}, {"id": "kept"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/kept"))
        .respond_with(detail(json!([]), "still here"))
        .mount(&server)
        .await;

    let emails = source(&server).fetch("is:unread", 15).await.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].id, "kept");
}

#[tokio::test]
async fn invalid_grant_is_credentials_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "invalid_grant", "error_description": "Token has been expired or revoked."})),
        )
        .mount(&server)
        .await;

    let err = source(&server).fetch("is:unread", 15).await.unwrap_err();
    match err {
        SourceError::CredentialsRejected(message) => assert!(message.contains("invalid_grant")),
        other => panic!("expected CredentialsRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn forbidden_listing_is_credentials_rejected() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient scope"))
        .mount(&server)
        .await;

    let err = source(&server).fetch("is:unread", 15).await.unwrap_err();
    assert!(matches!(err, SourceError::CredentialsRejected(_)));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;

    let err = source(&server).fetch("is:unread", 15).await.unwrap_err();
    assert!(matches!(err, SourceError::Api { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_host_is_unreachable() {
    // Nothing listens on the discard port.
    let uri = "http://127.0.0.1:9";
    let source = GmailSource::new(
        reqwest::Client::new(),
        GmailCredentials {
            client_id: "c".into(),
            client_secret: "s".into(),
            refresh_token: "r".into(),
        },
    )
    .with_endpoints(format!("{uri}/token"), format!("{uri}/gmail/v1"));

    let err = source.fetch("is:unread", 15).await.unwrap_err();
    assert!(matches!(err, SourceError::Unreachable(_)));
}
