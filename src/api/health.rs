use crate::{
    api::routes::AppState,
    errors::Result,
    observability::{metrics::CONTENT_TYPE, HealthResult},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn health_response(result: HealthResult) -> (StatusCode, Json<HealthResponse>) {
    match result {
        HealthResult::Healthy => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                error: None,
            }),
        ),
        HealthResult::Unhealthy(reason) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "unhealthy",
                error: Some(reason),
            }),
        ),
    }
}

/// GET /health - Database reachability probe
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    health_response(state.prober.probe().await)
}

/// GET /metrics - Prometheus metrics
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.metrics.encode()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}
