//! PhishGuard Server
//!
//! Classifies URLs as phishing or benign, keeps the classification history
//! and relays free-text prompts to a chat model.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        PHISHGUARD                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────────┐  ┌──────────────┐ │
//! │  │  API      │─▶│ ClassificationService│─▶│ Scorer (ONNX)│ │
//! │  │  (Axum)   │  └──────────┬───────────┘  └──────────────┘ │
//! │  │           │             ▼                                │
//! │  │           │─────▶┌─────────────┐      ┌──────────────┐  │
//! │  │           │      │ ResultStore │      │  ChatRelay   │  │
//! │  └─────┬─────┘      │ (Postgres)  │      │  (OpenAI)    │  │
//! │        └───────────▶└─────────────┘      └──────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
    timeout::TimeoutLayer,
};

pub use error::{AppError, AppResult};

use logic::{ChatRelay, ClassificationService, ResultStore, Scorer, ThresholdConfig};

/// Shared application state. Every dependency is injected.
#[derive(Clone)]
pub struct AppState {
    pub classifier: ClassificationService,
    pub store: Arc<dyn ResultStore>,
    pub chat: Arc<dyn ChatRelay>,
}

impl AppState {
    pub fn new(
        scorer: Arc<dyn Scorer>,
        store: Arc<dyn ResultStore>,
        chat: Arc<dyn ChatRelay>,
        threshold: ThresholdConfig,
    ) -> Self {
        Self {
            classifier: ClassificationService::new(scorer, store.clone(), threshold),
            store,
            chat,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState, request_timeout: Option<Duration>) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/detect-phishing", post(handlers::detection::detect_phishing))
        .route("/gpt-response", post(handlers::chat::gpt_response))
        .route("/add-data", post(handlers::records::add_data))
        .route("/fetch-latest", get(handlers::records::fetch_latest))
        .with_state(state);

    if let Some(timeout) = request_timeout {
        router = router
            .layer(TimeoutLayer::new(timeout))
            .layer(axum_middleware::map_response(format_timeout));
    }

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
}

/// TimeoutLayer answers with an empty 408; give it the usual error body
async fn format_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::Timeout.into_response();
    }
    response
}
