use crate::api::AppState;
use crate::api::auth::USER_ROLE_HEADER;
use crate::domain::Role;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// Marketplace area a route belongs to, for bounded metric labels.
fn resource_of(route: Option<&str>) -> &'static str {
    let Some(route) = route else {
        return "unmatched";
    };
    match route.trim_start_matches("/api").split('/').nth(1) {
        Some("rfq") if route.ends_with("/search") => "search",
        Some("rfq") => "rfq",
        Some("bids") => "bid",
        Some("keywords") => "keyword",
        Some("system" | "metrics") => "system",
        _ => "other",
    }
}

/// Role claimed by the caller. Validation happens in the extractor; this is
/// only a label.
fn caller_role(headers: &HeaderMap) -> &'static str {
    let Some(raw) = headers.get(USER_ROLE_HEADER) else {
        return "anonymous";
    };
    raw.to_str()
        .ok()
        .and_then(|r| r.parse::<Role>().ok())
        .map_or("invalid", Role::as_str)
}

/// The RFQ or bid id addressed by `/api/rfq/{id}/…` and `/api/bids/{id}/…`.
fn addressed_entity<'a>(route: &str, path: &'a str) -> Option<(&'static str, &'a str)> {
    let field = if route.starts_with("/api/rfq/{id}") {
        "rfq_id"
    } else if route.starts_with("/api/bids/{id}") {
        "bid_id"
    } else {
        return None;
    };
    path.split('/').nth(3).map(|id| (field, id))
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let resource = resource_of(route.as_deref());
    let role = caller_role(req.headers());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.clone(),
        resource,
        role,
        rfq_id = tracing::field::Empty,
        bid_id = tracing::field::Empty,
        user_id = tracing::field::Empty,
    );

    if let Some((field, id)) = route
        .as_deref()
        .and_then(|r| addressed_entity(r, &path))
    {
        span.record(field, id);
    }

    async move {
        let response = next.run(req).await;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let status = response.status().as_u16();

        let outcome = match status {
            409 => "conflict",
            500.. => "error",
            400..=499 => "rejected",
            _ => "success",
        };

        let labels = [
            ("method", method),
            ("resource", resource.to_string()),
            ("role", role.to_string()),
            ("status", status.to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());

        info!(
            event = "http_request_finished",
            duration_ms,
            status_code = status,
            outcome,
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("cache-control", HeaderValue::from_static("no-store"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_labels() {
        assert_eq!(resource_of(Some("/api/rfq")), "rfq");
        assert_eq!(resource_of(Some("/api/rfq/{id}/bids")), "rfq");
        assert_eq!(resource_of(Some("/api/rfq/search")), "search");
        assert_eq!(resource_of(Some("/api/bids/{id}/award")), "bid");
        assert_eq!(resource_of(Some("/api/keywords/trending")), "keyword");
        assert_eq!(resource_of(Some("/api/metrics")), "system");
        assert_eq!(resource_of(None), "unmatched");
    }

    #[test]
    fn test_caller_role_label() {
        let mut headers = HeaderMap::new();
        assert_eq!(caller_role(&headers), "anonymous");

        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("Vendor"));
        assert_eq!(caller_role(&headers), "vendor");

        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("root"));
        assert_eq!(caller_role(&headers), "invalid");
    }

    #[test]
    fn test_addressed_entity() {
        assert_eq!(
            addressed_entity("/api/rfq/{id}/bids", "/api/rfq/42/bids"),
            Some(("rfq_id", "42"))
        );
        assert_eq!(
            addressed_entity("/api/bids/{id}/award", "/api/bids/7/award"),
            Some(("bid_id", "7"))
        );
        assert_eq!(addressed_entity("/api/rfq/search", "/api/rfq/search"), None);
        assert_eq!(addressed_entity("/api/rfq", "/api/rfq"), None);
    }
}
