//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

/// Scoring backend failures. No partial results are ever returned.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Scoring batch must contain at least one URL")]
    EmptyBatch,

    #[error("Failed to initialize scoring session: {0}")]
    Session(String),

    #[error("Model inference failed: {0}")]
    Inference(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
}

/// Result store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Chat backend failures
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Chat backend unreachable: {0}")]
    Transport(String),

    #[error("Chat backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Chat backend returned no reply")]
    EmptyReply,
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}

/// Classification pipeline failures
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// HTTP-facing error. Every failure leaves the API as a JSON body.
#[derive(Debug)]
pub enum AppError {
    // 400 {error}
    ValidationError(String),

    // 404 {error}
    NotFound(String),

    // Body the extractor refused before it was read as JSON, e.g. 413
    Rejected {
        status: StatusCode,
        message: String,
    },

    // 408 {error, message}
    Timeout,

    // 500 {error, message}
    Failed {
        error: &'static str,
        message: String,
    },
}

impl AppError {
    /// Wrap a dependency failure under the endpoint's error label
    pub fn failed(error: &'static str, cause: impl std::fmt::Display) -> Self {
        AppError::Failed {
            error,
            message: cause.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ValidationError(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Rejected { status, message } => {
                tracing::debug!("Rejected request body ({}): {}", status, message);
                (status, Json(json!({ "error": message }))).into_response()
            }
            AppError::Timeout => {
                tracing::warn!("Request timed out");
                (
                    StatusCode::REQUEST_TIMEOUT,
                    Json(json!({
                        "error": "Request timed out",
                        "message": "The request did not complete within the configured timeout"
                    })),
                )
                    .into_response()
            }
            AppError::Failed { error, message } => {
                tracing::error!("{}: {}", error, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": error, "message": message })),
                )
                    .into_response()
            }
        }
    }
}
