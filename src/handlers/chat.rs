//! Chat relay handler

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::{AppState, AppResult, AppError};
use crate::models::{GptRequest, GptResponse};

use super::reject_body;

const RELAY_FAILED: &str = "Failed to get response from GPT model";

pub async fn gpt_response(
    State(state): State<AppState>,
    payload: Result<Json<GptRequest>, JsonRejection>,
) -> AppResult<Json<GptResponse>> {
    let Json(req) = payload.map_err(reject_body)?;
    let prompt = req.into_prompt()?;

    let reply = state.chat
        .relay(&prompt)
        .await
        .map_err(|e| AppError::failed(RELAY_FAILED, e))?;

    Ok(Json(GptResponse { reply }))
}
