use anyhow::Result;
use httpmock::prelude::*;
use roadmap_fn::domain::model::ErrorBody;
use roadmap_fn::{GeminiClient, GeneratorConfig, HttpEvent, RoadmapHandler};
use std::sync::{Arc, Mutex};

const API_KEY: &str = "test-secret-key-123";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn handler_for(api_base: &str, api_key: Option<&str>, strict: bool) -> RoadmapHandler<GeminiClient> {
    let api_base = api_base.to_string();
    let api_key = api_key.map(str::to_string);
    let config = GeneratorConfig::from_lookup(|key| match key {
        "GEMINI_API_BASE" => Some(api_base.clone()),
        "GEMINI_API_KEY" => api_key.clone(),
        _ => None,
    });
    RoadmapHandler::new(GeminiClient::new(&config)).with_strict_output(strict)
}

fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 60}
    })
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn log_subscriber(buffer: &LogBuffer) -> impl tracing::Subscriber + Send + Sync {
    let writer = buffer.clone();
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish()
}

/// 200 with the model's array relayed byte-for-byte.
#[tokio::test]
async fn test_bakery_scenario_returns_three_steps() -> Result<()> {
    let server = MockServer::start_async().await;
    let roadmap = r#"["Connect POS sales data to a daily dashboard","Forecast demand per product with a simple model","Auto-generate supplier orders from the forecast"]"#;

    let gemini = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .header("x-goog-api-key", API_KEY)
                .json_body_partial(
                    r#"{
                        "contents": [{"role": "user", "parts": [{"text": "Business/Industry: bakery. Key Problem: inventory waste."}]}],
                        "generationConfig": {
                            "responseMimeType": "application/json",
                            "responseSchema": {"type": "ARRAY", "items": {"type": "STRING"}}
                        }
                    }"#,
                );
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(gemini_reply(roadmap));
        })
        .await;

    let handler = handler_for(&server.base_url(), Some(API_KEY), false);
    let response = handler
        .handle_event(HttpEvent::with_body(
            r#"{"business": "bakery", "problem": "inventory waste"}"#,
        ))
        .await;

    gemini.assert_async().await;
    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(response.body, roadmap);

    let steps: Vec<String> = serde_json::from_str(&response.body)?;
    assert_eq!(steps.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_missing_input_does_not_call_model() -> Result<()> {
    let server = MockServer::start_async().await;
    let gemini = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_reply(r#"["a","b","c"]"#));
        })
        .await;

    let handler = handler_for(&server.base_url(), Some(API_KEY), false);

    for body in [
        r#"{"business": "", "problem": "x"}"#,
        "{}",
        r#"{"business": false, "problem": "x"}"#,
        r#"{"business": "bakery", "problem": 0}"#,
    ] {
        let response = handler.handle_event(HttpEvent::with_body(body)).await;
        assert_eq!(response.status_code, 400);
        let error: ErrorBody = serde_json::from_str(&response.body)?;
        assert_eq!(error.error, "Missing input.");
    }

    assert_eq!(gemini.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_network_error_is_opaque() -> Result<()> {
    // Nothing listens on port 1.
    let handler = handler_for("http://127.0.0.1:1", Some(API_KEY), false);
    let response = handler
        .handle_event(HttpEvent::with_body(
            r#"{"business": "bakery", "problem": "inventory waste"}"#,
        ))
        .await;

    assert_eq!(response.status_code, 500);
    let error: ErrorBody = serde_json::from_str(&response.body)?;
    assert_eq!(error.error, "An internal server error occurred.");
    assert!(!response.body.contains(API_KEY));
    assert!(!serde_json::to_string(&response)?.contains(API_KEY));
    Ok(())
}

#[tokio::test]
async fn test_upstream_error_status_is_opaque() -> Result<()> {
    let server = MockServer::start_async().await;
    let gemini = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(403).json_body(serde_json::json!({
                "error": {
                    "code": 403,
                    "message": format!("API key {} not valid. Please pass a valid API key.", API_KEY),
                    "status": "PERMISSION_DENIED"
                }
            }));
        })
        .await;

    let handler = handler_for(&server.base_url(), Some(API_KEY), false);
    let response = handler
        .handle_event(HttpEvent::with_body(r#"{"business": "clinic", "problem": "no-shows"}"#))
        .await;

    gemini.assert_async().await;
    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.body,
        r#"{"error":"An internal server error occurred."}"#
    );
    assert!(!response.body.contains("PERMISSION_DENIED"));
    Ok(())
}

#[tokio::test]
async fn test_missing_credential_fails_without_request() -> Result<()> {
    let server = MockServer::start_async().await;
    let gemini = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_reply(r#"["a","b","c"]"#));
        })
        .await;

    let handler = handler_for(&server.base_url(), None, false);
    assert!(!roadmap_fn::domain::ports::TextGenerator::has_credential(
        handler.generator()
    ));

    let response = handler
        .handle_event(HttpEvent::with_body(r#"{"business": "bakery", "problem": "waste"}"#))
        .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(gemini.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_blocked_prompt_is_internal_error() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            }));
        })
        .await;

    let handler = handler_for(&server.base_url(), Some(API_KEY), false);
    let response = handler
        .handle_event(HttpEvent::with_body(r#"{"business": "bakery", "problem": "waste"}"#))
        .await;

    assert_eq!(response.status_code, 500);
    assert!(!response.body.contains("SAFETY"));
    Ok(())
}

#[tokio::test]
async fn test_strict_output_rejects_prose() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200)
                .json_body(gemini_reply("Here is your roadmap: 1. Automate"));
        })
        .await;

    let lenient = handler_for(&server.base_url(), Some(API_KEY), false);
    let strict = handler_for(&server.base_url(), Some(API_KEY), true);
    let body = r#"{"business": "bakery", "problem": "waste"}"#;

    let relayed = lenient.handle_event(HttpEvent::with_body(body)).await;
    assert_eq!(relayed.status_code, 200);
    assert_eq!(relayed.body, "Here is your roadmap: 1. Automate");

    let rejected = strict.handle_event(HttpEvent::with_body(body)).await;
    assert_eq!(rejected.status_code, 500);
    Ok(())
}

/// The raw platform event goes through serde exactly as the runtime would deliver it.
#[tokio::test]
async fn test_platform_event_round_trip() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_reply(r#"["a","b","c"]"#));
        })
        .await;

    let event: HttpEvent = serde_json::from_value(serde_json::json!({
        "path": "/.netlify/functions/generate-roadmap",
        "httpMethod": "POST",
        "headers": {"content-type": "application/json"},
        "queryStringParameters": {},
        "body": "{\"business\":\"logistics\",\"problem\":\"manual invoice entry\"}",
        "isBase64Encoded": false
    }))?;

    let handler = handler_for(&server.base_url(), Some(API_KEY), false);
    let response = handler.handle_event(event).await;
    let value = serde_json::to_value(&response)?;

    assert_eq!(value["statusCode"], 200);
    assert_eq!(value["headers"]["Content-Type"], "application/json");
    assert_eq!(value["body"], r#"["a","b","c"]"#);
    Ok(())
}

#[tokio::test]
async fn test_credential_presence_is_logged() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_reply(r#"["a","b","c"]"#));
        })
        .await;
    let body = r#"{"business": "bakery", "problem": "inventory waste"}"#;

    let with_key = LogBuffer::default();
    {
        let _guard = tracing::subscriber::set_default(log_subscriber(&with_key));
        let handler = handler_for(&server.base_url(), Some(API_KEY), false);
        let response = handler.handle_event(HttpEvent::with_body(body)).await;
        assert_eq!(response.status_code, 200);
    }
    let logs = with_key.contents();
    assert!(logs.contains("api_key_present=true"), "logs: {}", logs);
    assert!(!logs.contains(API_KEY));

    let without_key = LogBuffer::default();
    {
        let _guard = tracing::subscriber::set_default(log_subscriber(&without_key));
        let handler = handler_for(&server.base_url(), None, false);
        let response = handler.handle_event(HttpEvent::with_body(body)).await;
        assert_eq!(response.status_code, 500);
    }
    let logs = without_key.contents();
    assert!(logs.contains("api_key_present=false"), "logs: {}", logs);
    assert!(logs.contains("GEMINI_API_KEY is not set"), "logs: {}", logs);
    Ok(())
}
