// tests/api.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use phishguard::error::{RelayError, ScoringError, StoreError};
use phishguard::logic::{ChatRelay, MemoryResultStore, ResultStore, Scorer, ThresholdConfig};
use phishguard::models::{ClassificationRecord, NewClassification};
use phishguard::{create_router, AppState};

struct FixedScorer {
    probability: f64,
    calls: AtomicUsize,
}

impl FixedScorer {
    fn new(probability: f64) -> Arc<Self> {
        Arc::new(Self { probability, calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl Scorer for FixedScorer {
    async fn score(&self, urls: &[String]) -> Result<Vec<f64>, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.probability; urls.len()])
    }
}

struct BrokenScorer;

#[async_trait]
impl Scorer for BrokenScorer {
    async fn score(&self, _urls: &[String]) -> Result<Vec<f64>, ScoringError> {
        Err(ScoringError::Inference("bad tensor".to_string()))
    }
}

struct SlowScorer {
    delay: Duration,
}

#[async_trait]
impl Scorer for SlowScorer {
    async fn score(&self, urls: &[String]) -> Result<Vec<f64>, ScoringError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![99.0; urls.len()])
    }
}

struct UnreachableStore;

#[async_trait]
impl ResultStore for UnreachableStore {
    async fn insert(&self, _record: &NewClassification) -> Result<(), StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn fetch_latest(&self) -> Result<Option<ClassificationRecord>, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }
}

struct EchoChat;

#[async_trait]
impl ChatRelay for EchoChat {
    async fn relay(&self, prompt: &str) -> Result<String, RelayError> {
        Ok(format!("echo: {}", prompt))
    }
}

struct DownChat;

#[async_trait]
impl ChatRelay for DownChat {
    async fn relay(&self, _prompt: &str) -> Result<String, RelayError> {
        Err(RelayError::Status { status: 401, body: "invalid api key".to_string() })
    }
}

fn app(scorer: Arc<dyn Scorer>, store: Arc<dyn ResultStore>, chat: Arc<dyn ChatRelay>) -> axum::Router {
    let state = AppState::new(scorer, store, chat, ThresholdConfig::default());
    create_router(state, None)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_detect_phishing_then_fetch_latest() {
    let store = Arc::new(MemoryResultStore::new());
    let app = app(FixedScorer::new(87.5), store.clone(), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": "http://evil.example" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "isPhishing": true, "probability": 87.5 }));

    let (status, body) = send(&app, get("/fetch-latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "http://evil.example");
    assert_eq!(body["is_phishing"], true);
    assert_eq!(body["probability"], 87.5);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_detect_phishing_boundary_is_benign() {
    let app = app(FixedScorer::new(50.0), Arc::new(MemoryResultStore::new()), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": "http://a.example" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "isPhishing": false, "probability": 50.0 }));
}

#[tokio::test]
async fn test_detect_phishing_requires_url() {
    let scorer = FixedScorer::new(99.0);
    let store = Arc::new(MemoryResultStore::new());
    let app = app(scorer.clone(), store.clone(), Arc::new(EchoChat));

    for body in [json!({}), json!({ "url": "" }), json!({ "url": null })] {
        let (status, resp) = send(&app, post_json("/detect-phishing", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, json!({ "error": "URL is required" }));
    }

    assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_detect_phishing_malformed_body_is_bad_request() {
    let app = app(FixedScorer::new(10.0), Arc::new(MemoryResultStore::new()), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_detect_phishing_store_down_is_server_error() {
    let scorer = FixedScorer::new(87.5);
    let app = app(scorer.clone(), Arc::new(UnreachableStore), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": "http://evil.example" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process the request");
    assert_eq!(body["message"], "Database error: connection refused");
    assert!(body.get("probability").is_none());
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_detect_phishing_scoring_failure_is_server_error() {
    let store = Arc::new(MemoryResultStore::new());
    let app = app(Arc::new(BrokenScorer), store.clone(), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": "http://a.example" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process the request");
    assert_eq!(body["message"], "Model inference failed: bad tensor");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_fetch_latest_empty_is_not_found() {
    let app = app(FixedScorer::new(10.0), Arc::new(MemoryResultStore::new()), Arc::new(EchoChat));

    let (status, body) = send(&app, get("/fetch-latest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No data found" }));
}

#[tokio::test]
async fn test_fetch_latest_store_down_is_server_error() {
    let app = app(FixedScorer::new(10.0), Arc::new(UnreachableStore), Arc::new(EchoChat));

    let (status, body) = send(&app, get("/fetch-latest")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch latest data");
    assert_eq!(body["message"], "Database error: connection refused");
}

#[tokio::test]
async fn test_add_data_stores_caller_verdict() {
    let store = Arc::new(MemoryResultStore::new());
    let app = app(FixedScorer::new(10.0), store.clone(), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/add-data", json!({
        "url": "http://a.example",
        "probability": 10,
        "isPhishing": true
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Data added successfully" }));

    let (_, latest) = send(&app, get("/fetch-latest")).await;
    assert_eq!(latest["url"], "http://a.example");
    assert_eq!(latest["is_phishing"], true);
    assert_eq!(latest["probability"], 10.0);
}

#[tokio::test]
async fn test_add_data_requires_all_fields() {
    let store = Arc::new(MemoryResultStore::new());
    let app = app(FixedScorer::new(10.0), store.clone(), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/add-data", json!({ "url": "http://a.example", "probability": 10 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "URL, probability, and isPhishing are required" }));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_add_data_store_down_is_server_error() {
    let app = app(FixedScorer::new(10.0), Arc::new(UnreachableStore), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/add-data", json!({
        "url": "http://a.example",
        "probability": 80.0,
        "isPhishing": true
    }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to add data");
}

#[tokio::test]
async fn test_gpt_response_relays_prompt() {
    let app = app(FixedScorer::new(10.0), Arc::new(MemoryResultStore::new()), Arc::new(EchoChat));

    let (status, body) = send(&app, post_json("/gpt-response", json!({ "prompt": "Is this link safe?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": "echo: Is this link safe?" }));

    let (status, body) = send(&app, post_json("/gpt-response", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Prompt is required" }));
}

#[tokio::test]
async fn test_gpt_response_backend_failure() {
    let app = app(FixedScorer::new(10.0), Arc::new(MemoryResultStore::new()), Arc::new(DownChat));

    let (status, body) = send(&app, post_json("/gpt-response", json!({ "prompt": "hello" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to get response from GPT model");
    assert_eq!(body["message"], "Chat backend returned 401: invalid api key");
}

#[tokio::test]
async fn test_health() {
    let app = app(FixedScorer::new(10.0), Arc::new(MemoryResultStore::new()), Arc::new(EchoChat));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_oversized_body_keeps_payload_too_large() {
    let store = Arc::new(MemoryResultStore::new());
    let app = app(FixedScorer::new(10.0), store.clone(), Arc::new(EchoChat));

    let huge_url = format!("http://{}.example", "a".repeat(3 * 1024 * 1024));
    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": huge_url }))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_request_timeout_is_formatted_and_not_stored() {
    let store = Arc::new(MemoryResultStore::new());
    let state = AppState::new(
        Arc::new(SlowScorer { delay: Duration::from_secs(3) }),
        store.clone(),
        Arc::new(EchoChat),
        ThresholdConfig::default(),
    );
    let app = create_router(state, Some(Duration::from_secs(1)));

    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": "http://slow.example" }))).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error"], "Request timed out");
    assert!(body["message"].is_string());

    // the handler future was dropped before it could persist anything
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_request_timeout_leaves_fast_requests_alone() {
    let app = create_router(
        AppState::new(
            FixedScorer::new(87.5),
            Arc::new(MemoryResultStore::new()),
            Arc::new(EchoChat),
            ThresholdConfig::default(),
        ),
        Some(Duration::from_secs(5)),
    );

    let (status, body) = send(&app, post_json("/detect-phishing", json!({ "url": "http://evil.example" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "isPhishing": true, "probability": 87.5 }));
}
