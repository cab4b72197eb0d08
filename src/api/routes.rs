use crate::{
    api::{health, middleware::track_requests, status},
    config::ServiceConfig,
    observability::{Metrics, Probe},
};
use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Metrics,
    pub prober: Arc<dyn Probe>,
    pub service: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(metrics: Metrics, prober: Arc<dyn Probe>, service: ServiceConfig) -> Self {
        Self {
            metrics,
            prober,
            service: Arc::new(service),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::root))
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        // Counting runs inside routing so the matched path is known
        .layer(from_fn_with_state(state.metrics.clone(), track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
