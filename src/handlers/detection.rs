//! Phishing detection handler

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::{AppState, AppResult, AppError};
use crate::error::ClassificationError;
use crate::models::{DetectPhishingRequest, Verdict};

use super::reject_body;

const DETECT_FAILED: &str = "Failed to process the request";

/// Score, decide and persist a single URL
pub async fn detect_phishing(
    State(state): State<AppState>,
    payload: Result<Json<DetectPhishingRequest>, JsonRejection>,
) -> AppResult<Json<Verdict>> {
    let Json(req) = payload.map_err(reject_body)?;
    let url = req.into_url()?;

    match state.classifier.classify(&url).await {
        Ok(verdict) => Ok(Json(verdict)),
        Err(ClassificationError::Validation(msg)) => Err(AppError::ValidationError(msg)),
        Err(e) => Err(AppError::failed(DETECT_FAILED, e)),
    }
}
