use std::io::Write;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use translate_cell::{translator_routes, Translator};

struct TestApp {
    server: MockServer,
    router: Router,
    _terms: NamedTempFile,
}

impl TestApp {
    async fn start() -> Self {
        Self::with_threshold(None).await
    }

    /// `Some(1.0)` sends every detection through the chat model.
    async fn with_threshold(threshold: Option<f64>) -> Self {
        let server = MockServer::start().await;

        let mut terms = NamedTempFile::new().unwrap();
        write!(
            terms,
            "{}",
            json!([
                { "ENGLISH": "Polyclinic", "CHINESE": "综合诊疗所", "MALAY": "Poliklinik", "TAMIL": "பலதுறை மருந்தகம்" },
                { "ENGLISH": "Influenza", "CHINESE": "流感", "MALAY": "Influenza", "TAMIL": "சளிக்காய்ச்சல்" }
            ])
        )
        .unwrap();

        let config = Arc::new(AppConfig {
            openai_api_base: server.uri(),
            openai_api_key: "test-openai-key".to_string(),
            openai_chat_model: "gpt-4o".to_string(),
            official_terms_path: terms.path().to_string_lossy().into_owned(),
            ..Default::default()
        });

        let mut translator = Translator::from_config(&config);
        if let Some(threshold) = threshold {
            translator = translator.with_score_threshold(threshold);
        }

        Self {
            router: translator_routes(Arc::new(translator)),
            server,
            _terms: terms,
        }
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

fn content_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }]
    })
}

#[tokio::test]
async fn translates_english_with_glossary() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-openai-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o", "max_tokens": 1024, "seed": 1234 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_completion("我想在综合诊疗所预约流感疫苗")))
        .mount(&app.server)
        .await;

    let (status, body) = app
        .post(
            "/translate",
            json!({ "text": "I want to book the Influenza vaccine at my Polyclinic", "target_language": "chinese" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "translated_text": "我想在综合诊疗所预约流感疫苗", "language_detected": "ENGLISH" })
    );

    let requests = app.server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests.last().unwrap().body).unwrap();
    let system_prompt = sent["messages"][0]["content"].as_str().unwrap();
    assert!(system_prompt.contains("| ENGLISH | CHINESE |"));
    assert!(system_prompt.contains("| Polyclinic | 综合诊疗所 |"));
}

#[tokio::test]
async fn detects_chinese_by_script() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_completion("unused")))
        .expect(0)
        .mount(&app.server)
        .await;

    let (status, body) = app
        .post("/translate/get_language", json!({ "text": "我想预约疫苗" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("chinese"));
}

#[tokio::test]
async fn low_confidence_text_asks_the_model() {
    let app = TestApp::with_threshold(Some(1.0)).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "response_format": { "type": "json_object" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "language_detector", "arguments": "{\"language\":\"malay\"}" }
                    }]
                }
            }]
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let (status, body) = app
        .post("/translate/get_language", json!({ "text": "Saya mahu vaksin influenza" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("malay"));
}

#[tokio::test]
async fn whitespace_text_is_rejected() {
    let app = TestApp::start().await;

    let (status, _) = app
        .post("/translate", json!({ "text": "   ", "target_language": "malay" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.post("/translate/get_language", json!({ "text": "\n" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_target_is_rejected() {
    let app = TestApp::start().await;

    let (status, _) = app
        .post("/translate", json!({ "text": "Hello there", "target_language": "unknown" }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn model_failure_is_reported_under_route_key() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&app.server)
        .await;

    let (status, body) = app
        .post(
            "/translate",
            json!({ "text": "I want to book a vaccine for my son", "target_language": "tamil" }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["Exception in /translate: "].as_str().unwrap();
    assert!(message.contains("upstream unavailable"));
}
