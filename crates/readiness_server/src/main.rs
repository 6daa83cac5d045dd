use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use readiness_registry::ReadinessRegistry;
use readiness_server::{AppState, ServerConfig, build_router, serve, shutdown_signal};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Log filter from `READINESS_LOG_LEVEL` (or `RUST_LOG`, default `info`).
    let log_env = readiness_server::config::log_filter();
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(readiness_server::env_filter(&log_env))
        .init();
    tracing::info!(%log_env, "readiness_server: log filter");

    let config = ServerConfig::from_env()?;
    let handle = PrometheusBuilder::new().install_recorder()?;

    let registry = Arc::new(ReadinessRegistry::new());
    registry.summary().publish();
    let state = Arc::new(AppState::new(registry, &config, handle));
    let app = build_router(state);

    let addr = config.addr;
    info!(
        %addr,
        value_parsing = %config.value_parsing,
        request_timeout = ?config.request_timeout,
        "starting HTTP server"
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = serve(listener, app, shutdown_signal()).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("server stopped");
    Ok(())
}
