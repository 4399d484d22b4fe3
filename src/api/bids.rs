use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::MaybePrincipal;
use super::validation::{validate_bid_id, validate_rfq_id};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::Principal;
use crate::models::{Bid, BidUpdate, BidView, NewBid};
use crate::services::Award;

/// `POST /api/rfq/{rfq_id}/bids`
pub async fn create_bid(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(rfq_id): Path<i32>,
    Json(payload): Json<NewBid>,
) -> Result<(StatusCode, Json<ApiResponse<Bid>>), ApiError> {
    let rfq_id = validate_rfq_id(rfq_id)?;
    let bid = state
        .bid_service()
        .create(rfq_id, &principal, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(bid))))
}

/// `GET /api/rfq/{rfq_id}/bids`
///
/// Anonymous callers get sealed bids.
pub async fn list_bids(
    State(state): State<Arc<AppState>>,
    MaybePrincipal(viewer): MaybePrincipal,
    Path(rfq_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<BidView>>>, ApiError> {
    let rfq_id = validate_rfq_id(rfq_id)?;
    let bids = state
        .bid_service()
        .list_for_rfq(rfq_id, viewer.as_ref())
        .await?;
    Ok(Json(ApiResponse::success(bids)))
}

/// `GET /api/bids/{id}`
pub async fn get_bid(
    State(state): State<Arc<AppState>>,
    MaybePrincipal(viewer): MaybePrincipal,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BidView>>, ApiError> {
    let id = validate_bid_id(id)?;
    let bid = state.bid_service().view(id, viewer.as_ref()).await?;
    Ok(Json(ApiResponse::success(bid)))
}

/// `PUT /api/bids/{id}`
pub async fn update_bid(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<BidUpdate>,
) -> Result<Json<ApiResponse<Bid>>, ApiError> {
    let id = validate_bid_id(id)?;
    let bid = state.bid_service().update(id, payload, &principal).await?;
    Ok(Json(ApiResponse::success(bid)))
}

/// `POST /api/bids/{id}/award`
pub async fn award_bid(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Award>>, ApiError> {
    let id = validate_bid_id(id)?;
    let award = state.bid_service().award(id, &principal).await?;
    Ok(Json(ApiResponse::success(award)))
}

/// `POST /api/bids/{id}/retract`
pub async fn retract_bid(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Bid>>, ApiError> {
    let id = validate_bid_id(id)?;
    let bid = state.bid_service().retract(id, &principal).await?;
    Ok(Json(ApiResponse::success(bid)))
}
