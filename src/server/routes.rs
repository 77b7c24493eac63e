//! API route handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::app::pipeline::run_forecast;
use crate::domain::{ForecastResponse, LISTED_DEPARTMENTS};
use crate::error::{AppError, ErrorKind};
use crate::io::encode_path_segment;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// `GET /`: forecast URLs for the advertised departments.
///
/// Static: the data file is not consulted.
pub async fn index(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    let base = format!("{}/api/forecast/", state.config.public_url);
    let urls = LISTED_DEPARTMENTS
        .iter()
        .map(|dept| (dept.to_string(), format!("{base}{}", encode_path_segment(dept))))
        .collect();
    Json(urls)
}

/// `GET /api/forecast/{department}`
pub async fn forecast(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> Result<Json<ForecastResponse>, AppError> {
    let config = Arc::clone(&state.config);
    let dept = department.clone();

    // Loading, fitting and rendering are blocking work.
    let outcome = tokio::task::spawn_blocking(move || run_forecast(&config, &dept))
        .await
        .map_err(|e| AppError::internal(format!("Forecast task failed: {e}")))?;

    match outcome {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            match err.kind() {
                ErrorKind::NotFound => tracing::info!(department = %department, "department not found"),
                ErrorKind::Internal => tracing::warn!(department = %department, error = %err, "forecast failed"),
            }
            Err(err)
        }
    }
}

/// `GET /health`
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
