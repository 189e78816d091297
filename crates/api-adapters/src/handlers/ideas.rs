//! Idea box endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domains::DomainError;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitIdeaRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub idea: String,
}

pub async fn submit_idea(
    State(state): State<AppState>,
    payload: Result<Json<SubmitIdeaRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let idea = state
        .submissions
        .submit(&payload.username, &payload.idea)
        .await
        .map_err(|e| match e {
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
            other => {
                error!(error = %other, "idea submission failed");
                ApiError::Internal("Failed to submit idea".into())
            }
        })?;

    state.metrics.record_idea_submitted();

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "idea": idea })),
    ))
}

pub async fn list_ideas(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let ideas = state.submissions.list().await.map_err(|e| {
        error!(error = %e, "failed to load ideas");
        ApiError::Internal("Failed to load ideas".into())
    })?;

    Ok(Json(json!({ "ideas": ideas })))
}
