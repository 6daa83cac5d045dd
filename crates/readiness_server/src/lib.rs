//! HTTP liveness and readiness checks backed by a [`ReadinessRegistry`].
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /health` | liveness, always 200 |
//! | `GET /ready?component=` | 200 ready, 503 not ready, 404 unknown |
//! | `GET,POST /set-ready?component=&value=` | update a component |
//! | `GET /list[?format=json]` | every component and its flag |
//! | `GET /metrics` | Prometheus exposition |

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use readiness_registry::{ReadinessRegistry, ValueParsing};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};

/// Shared state handed to every handler.
pub struct AppState {
    pub registry: Arc<ReadinessRegistry>,
    pub value_parsing: ValueParsing,
    pub request_timeout: Duration,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        registry: Arc<ReadinessRegistry>,
        config: &ServerConfig,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            registry,
            value_parsing: config.value_parsing,
            request_timeout: config.request_timeout,
            metrics,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let request_timeout = state.request_timeout;
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/set-ready", get(handlers::set_ready).post(handlers::set_ready))
        .route("/list", get(handlers::list))
        .route("/metrics", get(handlers::metrics_endpoint))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(middleware::track_requests))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server keeps
/// running until killed.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!("failed to install ctrl+c handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// Build the tracing filter, falling back to `info` on an invalid directive.
pub fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER))
}
