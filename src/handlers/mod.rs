//! HTTP handlers

pub mod health;
pub mod detection;
pub mod chat;
pub mod records;

use axum::extract::rejection::JsonRejection;

use crate::error::AppError;

/// Unparseable or mistyped bodies are client errors like missing fields.
/// Rejections raised before the JSON is looked at (body too large, broken
/// stream) keep the extractor's status.
pub(crate) fn reject_body(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_)
        | JsonRejection::JsonSyntaxError(_)
        | JsonRejection::MissingJsonContentType(_) => {
            AppError::ValidationError(rejection.body_text())
        }
        other => AppError::Rejected {
            status: other.status(),
            message: other.body_text(),
        },
    }
}
