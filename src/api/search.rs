use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, KeywordLookupQuery, LimitQuery, SearchQuery, SuggestQuery,
};
use crate::models::{KeywordSuggestion, KeywordTrend, Rfq, SearchHit};

/// `GET /api/rfq/search?q=&keywords=a,b&category_id=&budget_min=&budget_max=&limit=&offset=`
pub async fn search_rfqs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchHit>>>, ApiError> {
    let page = state.search_service().search(query.into()).await?;
    Ok(Json(ApiResponse::page(page)))
}

/// `GET /api/keywords/rfqs?keywords=a,b`
pub async fn rfqs_by_keywords(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeywordLookupQuery>,
) -> Result<Json<ApiResponse<Vec<Rfq>>>, ApiError> {
    let page = state
        .search_service()
        .find_by_keywords(&query.keyword_list(), query.limit, query.offset)
        .await?;
    Ok(Json(ApiResponse::page(page)))
}

/// `GET /api/keywords/suggestions?q=`
pub async fn suggest_keywords(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<ApiResponse<Vec<KeywordSuggestion>>>, ApiError> {
    let suggestions = state
        .search_service()
        .suggest(&query.q, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(suggestions)))
}

/// `GET /api/keywords/trending`
pub async fn trending_keywords(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<KeywordTrend>>>, ApiError> {
    let trends = state.trend_service().trending(query.limit).await?;
    Ok(Json(ApiResponse::success(trends)))
}

/// `GET /api/keywords/most-searched`
pub async fn most_searched_keywords(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<KeywordTrend>>>, ApiError> {
    let trends = state.trend_service().most_searched(query.limit).await?;
    Ok(Json(ApiResponse::success(trends)))
}
