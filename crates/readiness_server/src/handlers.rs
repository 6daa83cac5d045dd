use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use axum::debug_handler;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use readiness_registry::parse_ready_value;
use tracing::{debug, info};

use crate::AppState;
use crate::error::{ApiError, ApiResult};

pub const HEALTH_BODY: &str = "Server is healthy!";
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// Raw query pairs in request order, so a repeated name keeps all its values.
pub type QueryParams = Vec<(String, String)>;

/// First value for `name`. An empty value counts as missing.
fn param(params: &[(String, String)], name: &str) -> Option<String> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
        .filter(|value| !value.is_empty())
}

/// Liveness: the process is up, regardless of any component.
#[debug_handler]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, HEALTH_BODY)
}

#[debug_handler]
pub async fn ready(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> ApiResult<(StatusCode, String)> {
    let component = param(&params, "component").ok_or(ApiError::MissingComponent)?;

    match state.registry.is_ready(&component) {
        Some(true) => Ok((StatusCode::OK, format!("Component '{component}' is ready!"))),
        Some(false) => Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Component '{component}' is not ready!"),
        )),
        None => {
            debug!(%component, "readiness check for unknown component");
            Err(ApiError::UnknownComponent(component))
        }
    }
}

#[debug_handler]
pub async fn set_ready(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> ApiResult<String> {
    let (Some(component), Some(value)) = (param(&params, "component"), param(&params, "value"))
    else {
        return Err(ApiError::MissingComponentOrValue);
    };
    let ready = parse_ready_value(&value, state.value_parsing)?;

    let previous = state.registry.set_state(component.clone(), ready);
    if previous == Some(ready) {
        debug!(%component, ready, "readiness unchanged");
    } else {
        info!(%component, ready, ?previous, "component readiness changed");
    }

    Ok(format!("Component '{component}' readiness set to {ready}"))
}

/// Dump every component, sorted by name. `?format=json` returns an object
/// keyed by component instead of plain text.
#[debug_handler]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Response {
    let components: BTreeMap<String, bool> = state.registry.list_components().into_iter().collect();

    if param(&params, "format").as_deref() == Some("json") {
        return Json(components).into_response();
    }

    let mut body = String::new();
    for (component, ready) in &components {
        // writing to a String cannot fail
        let _ = writeln!(body, "Component: {component}, Ready: {ready}");
    }
    (StatusCode::OK, body).into_response()
}

/// Component gauges are refreshed from the registry on every scrape, so they
/// always describe the registry as of this request.
#[debug_handler]
pub async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summary = state.registry.summary();
    summary.publish();
    debug!(
        total = summary.total,
        ready = summary.ready,
        all_ready = summary.all_ready(),
        "publishing component gauges"
    );
    let body = state.metrics.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}
