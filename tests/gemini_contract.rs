//! Gemini client contract tests.
//!
//! Verify the exact HTTP request format of `generateContent`, the response
//! extraction policy, and the failure taxonomy against a mock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gemchat::config::Config;
use gemchat::gemini::{GeminiClient, GeminiError, NO_RESPONSE};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = Config {
        api_key: "test-key".to_string(),
        model: "gemini-pro".to_string(),
        base_url: server.uri(),
        home: std::path::PathBuf::new(),
    };
    GeminiClient::new(&config)
}

#[tokio::test]
async fn request_carries_the_wire_shape_and_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "Hello"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Hi"}]}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let completion = client.generate("Hello").await.unwrap();
    assert_eq!(completion, "Hi");
}

#[tokio::test]
async fn only_the_first_candidate_part_is_consulted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other candidate"}]}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.generate("prompt").await.unwrap(), "first");
}

#[tokio::test]
async fn missing_candidates_falls_back_to_no_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.generate("prompt").await.unwrap(), NO_RESPONSE);
}

#[tokio::test]
async fn missing_part_text_falls_back_to_no_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{}]}}]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.generate("prompt").await.unwrap(), NO_RESPONSE);
}

#[tokio::test]
async fn non_2xx_status_is_a_status_error_regardless_of_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ignored"}]}}]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GeminiError::Status(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn a_body_that_is_not_json_is_a_shape_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GeminiError::Shape(_)));
}

#[tokio::test]
async fn an_unreachable_server_is_a_transport_error() {
    let config = Config {
        api_key: "test-key".to_string(),
        model: "gemini-pro".to_string(),
        // Port 1 is never listening
        base_url: "http://127.0.0.1:1".to_string(),
        home: std::path::PathBuf::new(),
    };
    let client = GeminiClient::new(&config);

    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GeminiError::Transport(_)));
}
