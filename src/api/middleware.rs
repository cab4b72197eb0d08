use crate::observability::Metrics;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Request metering middleware
///
/// Counts the request before the handler runs, then records its latency.
/// The path label is the matched route, so unknown paths share a single
/// series instead of growing the registry.
pub async fn track_requests(
    State(metrics): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = route_label(&request);

    metrics.record_request(&method, &path);

    let started = Instant::now();
    let response = next.run(request).await;

    metrics.record_duration(&method, &path, response.status().as_u16(), started.elapsed());

    response
}

fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}
