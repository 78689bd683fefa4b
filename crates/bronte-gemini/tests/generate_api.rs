use std::time::Duration;

use bronte_gemini::{first_candidate_text, GeminiClient, SecretString, UpstreamError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri())
}

fn key() -> SecretString {
    SecretString::from("test-key-123")
}

fn contents() -> Vec<serde_json::Value> {
    vec![json!({ "role": "user", "parts": [{ "text": "hello" }] })]
}

fn candidate_payload(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [{ "text": text }] }, "finishReason": "STOP" }
        ]
    })
}

#[tokio::test]
async fn test_generate_posts_contents_and_decodes_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({ "contents": contents() })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_payload("hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap();

    assert_eq!(first_candidate_text(&response), Some("hi there"));
}

#[tokio::test]
async fn test_api_key_travels_in_header_not_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key-123"))
        .and(query_param_is_missing("key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_payload("ok")))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rate_limit_maps_to_retryable_error_with_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::RateLimited { .. }));
    assert!(err.is_retryable());
    assert_eq!(err.status(), Some(429));
    assert!(err.to_string().contains("Resource has been exhausted"));
}

#[tokio::test]
async fn test_bad_request_is_terminal_and_keeps_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "Invalid model name" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("no-such-model", &key(), &contents())
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Status { status: 400, .. }));
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("Invalid model name"));
}

#[tokio::test]
async fn test_server_errors_are_retryable() {
    for status in [500u16, 503] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate("gemini-2.5-flash", &key(), &contents())
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Unavailable { .. }));
        assert!(err.is_retryable());
        assert_eq!(err.status(), Some(status));
    }
}

#[tokio::test]
async fn test_bad_gateway_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Status { status: 502, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_undecodable_success_body_is_invalid_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::InvalidPayload(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_error_message_falls_back_to_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota check failed"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("quota check failed"));
}

#[tokio::test]
async fn test_error_message_falls_back_to_status_line_for_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_payload("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(Duration::from_secs(5))
        .unwrap()
        .with_base_url(format!("{}/", server.uri()));

    client
        .generate("gemini-2.5-flash", &key(), &contents())
        .await
        .unwrap();
}
