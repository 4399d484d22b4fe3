use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_rfq_id;
use super::{ApiError, ApiResponse, AppState, KeywordsRequest, KeywordsResponse};
use crate::domain::Principal;

/// `GET /api/rfq/{id}/keywords`
pub async fn list_keywords(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<KeywordsResponse>>, ApiError> {
    let rfq_id = validate_rfq_id(id)?;
    let keywords = state.keyword_service().list(rfq_id).await?;
    Ok(Json(ApiResponse::success(KeywordsResponse { rfq_id, keywords })))
}

/// `POST /api/rfq/{id}/keywords`
pub async fn add_keywords(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<KeywordsRequest>,
) -> Result<Json<ApiResponse<KeywordsResponse>>, ApiError> {
    let rfq_id = validate_rfq_id(id)?;
    let keywords = state
        .keyword_service()
        .add(rfq_id, &payload.keywords, &principal)
        .await?;
    Ok(Json(ApiResponse::success(KeywordsResponse { rfq_id, keywords })))
}

/// `DELETE /api/rfq/{id}/keywords`
pub async fn remove_keywords(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<KeywordsRequest>,
) -> Result<Json<ApiResponse<KeywordsResponse>>, ApiError> {
    let rfq_id = validate_rfq_id(id)?;
    let keywords = state
        .keyword_service()
        .remove(rfq_id, &payload.keywords, &principal)
        .await?;
    Ok(Json(ApiResponse::success(KeywordsResponse { rfq_id, keywords })))
}
