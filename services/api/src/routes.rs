use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use recruit_ai::workflows::campaign::{
    campaign_router, CampaignAppState, CampaignStore, CandidateSource, SearchInsights,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

pub(crate) const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRequest {
    pub(crate) query: String,
}

pub(crate) fn with_campaign_routes<S, C>(state: CampaignAppState<S, C>) -> axum::Router
where
    S: CandidateSource + 'static,
    C: CampaignStore + 'static,
{
    campaign_router(state)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/search", axum::routing::post(search_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Standalone sourcing-signal probe. The same templated insights are captured
/// automatically when a campaign is created; this endpoint lets operators
/// preview them for an arbitrary query.
pub(crate) async fn search_endpoint(Json(payload): Json<SearchRequest>) -> Response {
    let query = payload.query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        let body = Json(json!({
            "error": format!("search query must be at least {MIN_QUERY_CHARS} characters"),
        }));
        return (StatusCode::BAD_REQUEST, body).into_response();
    }

    info!(%query, "search insights requested");
    (StatusCode::OK, Json(SearchInsights::for_query(query))).into_response()
}
