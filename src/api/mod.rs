use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod bids;
mod error;
mod keywords;
mod observability;
mod rfq;
mod search;
mod system;
mod types;
mod validation;

pub use auth::MaybePrincipal;
pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{BidService, KeywordService, RfqService, SearchService, TrendService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn rfq_service(&self) -> &Arc<dyn RfqService> {
        &self.shared.rfq_service
    }

    #[must_use]
    pub fn bid_service(&self) -> &Arc<dyn BidService> {
        &self.shared.bid_service
    }

    #[must_use]
    pub fn keyword_service(&self) -> &Arc<dyn KeywordService> {
        &self.shared.keyword_service
    }

    #[must_use]
    pub fn trend_service(&self) -> &Arc<dyn TrendService> {
        &self.shared.trend_service
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<dyn SearchService> {
        &self.shared.search_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().read().await.server.cors_allowed_origins.clone();

    let api_router = create_api_router().with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rfq", get(rfq::list_rfqs).post(rfq::create_rfq))
        .route("/rfq/search", get(search::search_rfqs))
        .route("/rfq/{id}", get(rfq::get_rfq).put(rfq::update_rfq))
        .route("/rfq/{id}/close", post(rfq::close_rfq))
        .route("/rfq/{id}/related", get(rfq::related_rfqs))
        .route(
            "/rfq/{id}/bids",
            get(bids::list_bids).post(bids::create_bid),
        )
        .route(
            "/rfq/{id}/keywords",
            get(keywords::list_keywords)
                .post(keywords::add_keywords)
                .delete(keywords::remove_keywords),
        )
        .route("/bids/{id}", get(bids::get_bid).put(bids::update_bid))
        .route("/bids/{id}/award", post(bids::award_bid))
        .route("/bids/{id}/retract", post(bids::retract_bid))
        .route("/keywords/trending", get(search::trending_keywords))
        .route("/keywords/most-searched", get(search::most_searched_keywords))
        .route("/keywords/suggestions", get(search::suggest_keywords))
        .route("/keywords/rfqs", get(search::rfqs_by_keywords))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
}
