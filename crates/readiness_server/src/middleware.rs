//! Per-request logging and metrics.
//!
//! Sits between the router and the handlers so handlers only deal with
//! registry semantics. Requests are labelled by their route template; paths
//! that match no route share the `unmatched` label to keep label cardinality
//! bounded.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

pub const HTTP_REQUESTS_TOTAL: &str = "readiness_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "readiness_http_request_duration_seconds";

const UNMATCHED_PATH: &str = "unmatched";

pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH.to_owned());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();
    debug!(%method, %path, status = status.as_u16(), ?duration, "request completed");

    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "path" => path.clone(),
        "method" => method,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!(HTTP_REQUEST_DURATION_SECONDS, "path" => path)
        .record(duration.as_secs_f64());

    response
}
