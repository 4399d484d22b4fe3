use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::validate_rfq_id;
use super::{ApiError, ApiResponse, AppState};
use crate::domain::Principal;
use crate::models::{NewRfq, Rfq, RfqFilter, RfqUpdate};

/// `GET /api/rfq`
pub async fn list_rfqs(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RfqFilter>,
) -> Result<Json<ApiResponse<Vec<Rfq>>>, ApiError> {
    let page = state.rfq_service().list(filter).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// `GET /api/rfq/{id}`
pub async fn get_rfq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Rfq>>, ApiError> {
    let id = validate_rfq_id(id)?;
    let rfq = state.rfq_service().get(id).await?;
    Ok(Json(ApiResponse::success(rfq)))
}

/// `POST /api/rfq`
pub async fn create_rfq(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<NewRfq>,
) -> Result<(StatusCode, Json<ApiResponse<Rfq>>), ApiError> {
    let rfq = state.rfq_service().create(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rfq))))
}

/// `PUT /api/rfq/{id}`
pub async fn update_rfq(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<RfqUpdate>,
) -> Result<Json<ApiResponse<Rfq>>, ApiError> {
    let id = validate_rfq_id(id)?;
    let rfq = state.rfq_service().update(id, payload, &principal).await?;
    Ok(Json(ApiResponse::success(rfq)))
}

/// `POST /api/rfq/{id}/close`
pub async fn close_rfq(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Rfq>>, ApiError> {
    let id = validate_rfq_id(id)?;
    let rfq = state.rfq_service().close(id, &principal).await?;
    Ok(Json(ApiResponse::success(rfq)))
}

/// `GET /api/rfq/{id}/related`
///
/// Unlike the service call, an unknown RFQ is a 404 here.
pub async fn related_rfqs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Rfq>>>, ApiError> {
    let id = validate_rfq_id(id)?;
    state.rfq_service().get(id).await?;

    let related = state.rfq_service().find_related(id).await?;
    Ok(Json(ApiResponse::success(related)))
}
