//! HTTP surface.
//!
//! Routes:
//! - `GET /`: advertised department forecast URLs
//! - `GET /api/forecast/{department}`: run the pipeline, return JSON
//! - `GET /forecasted_csv/*`, `GET /plots/*`: the generated artifacts
//! - `GET /health`: liveness

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::domain::ServerConfig;
use crate::error::AppError;
use crate::io::{CSV_ROUTE, PLOT_ROUTE};

pub mod routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

/// Build the router for `config`.
pub fn router(config: ServerConfig) -> Router {
    let csv_dir = ServeDir::new(&config.csv_dir);
    let plot_dir = ServeDir::new(&config.plot_dir);
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(routes::index))
        .route("/api/forecast/{department}", get(routes::forecast))
        .route("/health", get(routes::liveness))
        .nest_service(CSV_ROUTE, csv_dir)
        .nest_service(PLOT_ROUTE, plot_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create both output directories if they do not exist yet.
pub fn ensure_output_dirs(config: &ServerConfig) -> Result<(), AppError> {
    for dir in [&config.csv_dir, &config.plot_dir] {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::internal(format!("Failed to create directory '{}': {e}", dir.display())))?;
    }
    Ok(())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), AppError> {
    ensure_output_dirs(&config)?;

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}:{}: {e}", config.host, config.port)))?;
    let addr: SocketAddr = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("Failed to read bound address: {e}")))?;

    tracing::info!(
        "placement-forecast v{} listening on {} (data: {})",
        env!("CARGO_PKG_VERSION"),
        addr,
        config.data_file.display()
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutting down");
}
