//! Classification history handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::{AppState, AppResult, AppError};
use crate::models::{AddDataRequest, AddDataResponse, ClassificationRecord};

use super::reject_body;

const ADD_FAILED: &str = "Failed to add data";
const FETCH_FAILED: &str = "Failed to fetch latest data";
const NO_DATA: &str = "No data found";

/// Manual insert, stored exactly as supplied
pub async fn add_data(
    State(state): State<AppState>,
    payload: Result<Json<AddDataRequest>, JsonRejection>,
) -> AppResult<Json<AddDataResponse>> {
    let Json(req) = payload.map_err(reject_body)?;
    let record = req.into_new_classification()?;

    state.store
        .insert(&record)
        .await
        .map_err(|e| AppError::failed(ADD_FAILED, e))?;

    Ok(Json(AddDataResponse {
        message: "Data added successfully".to_string(),
    }))
}

/// Most recent record, 404 when the history is empty
pub async fn fetch_latest(
    State(state): State<AppState>,
) -> AppResult<Json<ClassificationRecord>> {
    let record = state.store
        .fetch_latest()
        .await
        .map_err(|e| AppError::failed(FETCH_FAILED, e))?
        .ok_or_else(|| AppError::NotFound(NO_DATA.to_string()))?;

    Ok(Json(record))
}
