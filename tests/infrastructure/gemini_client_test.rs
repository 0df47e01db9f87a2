use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::{Value, json};

use meeting_summarizer::application::ports::{LlmClient, LlmClientError};
use meeting_summarizer::domain::ApiKey;
use meeting_summarizer::infrastructure::llm::{GeminiClient, GenerateContentResponse};

use crate::helpers::start_mock_server;

const GENERATE_PATH: &str = "/models/gemini-pro:generateContent";

#[derive(Debug, Clone)]
struct Captured {
    key: Option<String>,
    body: Value,
}

fn mock_gemini(
    status: u16,
    response: Value,
    captured: Arc<Mutex<Vec<Captured>>>,
) -> Router {
    Router::new().route(
        GENERATE_PATH,
        post(
            move |Query(query): Query<HashMap<String, String>>, axum::Json(body): axum::Json<Value>| {
                let captured = captured.clone();
                let response = response.clone();
                async move {
                    captured.lock().unwrap().push(Captured {
                        key: query.get("key").cloned(),
                        body,
                    });
                    (
                        StatusCode::from_u16(status).unwrap(),
                        axum::Json(response),
                    )
                        .into_response()
                }
            },
        ),
    )
}

fn client(base_url: &str) -> GeminiClient {
    GeminiClient::new(base_url, "gemini-pro", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn given_candidate_text_when_generating_then_returns_first_part() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let response = json!({
        "candidates": [
            { "content": { "parts": [{ "text": "Summary one." }, { "text": "ignored" }] } },
            { "content": { "parts": [{ "text": "Summary two." }] } }
        ]
    });
    let (base_url, shutdown_tx) =
        start_mock_server(mock_gemini(200, response, captured.clone())).await;

    let text = client(&base_url)
        .generate(&ApiKey::new("gm-key"), "A: hi\nB: hello")
        .await
        .unwrap();

    assert_eq!(text.as_deref(), Some("Summary one."));
    let request = captured.lock().unwrap()[0].clone();
    assert_eq!(request.key.as_deref(), Some("gm-key"));
    assert_eq!(
        request.body,
        json!({ "contents": [{ "parts": [{ "text": "A: hi\nB: hello" }] }] })
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_candidates_when_generating_then_returns_none() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let (base_url, shutdown_tx) =
        start_mock_server(mock_gemini(200, json!({ "promptFeedback": {} }), captured)).await;

    let text = client(&base_url)
        .generate(&ApiKey::new("gm-key"), "hello")
        .await
        .unwrap();

    assert!(text.is_none());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_rate_limit_when_generating_then_returns_rate_limited() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let (base_url, shutdown_tx) =
        start_mock_server(mock_gemini(429, json!({ "error": {} }), captured)).await;

    let err = client(&base_url)
        .generate(&ApiKey::new("gm-key"), "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, LlmClientError::RateLimited));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_generating_then_returns_request_failure() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let (base_url, shutdown_tx) = start_mock_server(mock_gemini(
        500,
        json!({ "error": { "message": "internal" } }),
        captured,
    ))
    .await;

    let err = client(&base_url)
        .generate(&ApiKey::new("gm-key"), "hello")
        .await
        .unwrap_err();

    match err {
        LlmClientError::ApiRequestFailed(message) => assert!(message.contains("500")),
        other => panic!("expected ApiRequestFailed, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_service_when_generating_then_error_does_not_leak_key() {
    let err = client("http://127.0.0.1:1")
        .generate(&ApiKey::new("super-secret-key"), "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, LlmClientError::ApiRequestFailed(_)));
    assert!(!err.to_string().contains("super-secret-key"));
}

#[test]
fn given_candidate_without_content_when_reading_first_text_then_returns_none() {
    let response: GenerateContentResponse =
        serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();

    assert!(response.first_text().is_none());
}
