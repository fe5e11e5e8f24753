//! Styling assistant transcript and fallbacks.

use athyre_integration_tests::{TestApp, test_config_with_gemini};
use athyre_storefront::services::stylist::{FAILURE_MESSAGE, UNAVAILABLE_MESSAGE};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_transcript_starts_with_welcome() {
    let mut app = TestApp::new();

    let transcript = app.get("/assistant").await;
    assert_eq!(transcript.status, StatusCode::OK);
    assert!(transcript.body.contains("Welcome to ATHŸRE."));
}

#[tokio::test]
async fn test_widget_shows_typing_indicator_while_waiting() {
    let mut app = TestApp::new();

    let page = app.get("/").await;
    assert!(page.body.contains("hx-indicator=\"#assistant-typing\""));

    let typing = page
        .body
        .split("id=\"assistant-typing\"")
        .nth(1)
        .expect("typing bubble rendered");
    assert!(typing.starts_with(" class=\"htmx-indicator"));
    assert!(typing.contains("animate-pulse"));
}

#[tokio::test]
async fn test_without_key_replies_unavailable() {
    let mut app = TestApp::new();

    let transcript = app.post_form("/assistant", "message=marathon+training").await;
    assert_eq!(transcript.status, StatusCode::OK);
    assert!(transcript.body.contains("marathon training"));
    assert!(transcript.body.contains(UNAVAILABLE_MESSAGE));
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let mut app = TestApp::new();

    let transcript = app.post_form("/assistant", "message=+++").await;
    assert_eq!(transcript.status, StatusCode::OK);
    assert!(!transcript.body.contains(UNAVAILABLE_MESSAGE));
}

#[tokio::test]
async fn test_advice_is_appended_to_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Pair the Rise Tank with Rise Shorts." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = TestApp::with_config(test_config_with_gemini(&server.uri()));
    let transcript = app.post_form("/assistant", "message=hot+yoga").await;

    assert!(transcript.body.contains("hot yoga"));
    assert!(transcript.body.contains("Pair the Rise Tank with Rise Shorts."));

    let reloaded = app.get("/assistant").await;
    assert!(reloaded.body.contains("Pair the Rise Tank with Rise Shorts."));
}

#[tokio::test]
async fn test_upstream_failure_shows_fallback_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let mut app = TestApp::with_config(test_config_with_gemini(&server.uri()));
    let transcript = app.post_form("/assistant", "message=cycling").await;

    assert_eq!(transcript.status, StatusCode::OK);
    assert!(transcript.body.contains(FAILURE_MESSAGE));
    assert!(!transcript.body.contains("overloaded"));
}
