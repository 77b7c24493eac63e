//! Shared forecast pipeline used by both the HTTP server and the CLI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load CSV -> year index -> department series -> ARIMA fit -> forecast -> plot + CSV
//!
//! The front-ends only decide how to present the result (JSON body vs stdout).

use chrono::{Datelike, NaiveDate};
use tracing::{debug, error, info};

use crate::data::PlacementTable;
use crate::domain::{
    ArimaOrder, FORECAST_HORIZON, ForecastPoint, ForecastResponse, ForecastResult, PLACEMENT_ORDER, PlacementSeries,
    ServerConfig,
};
use crate::error::AppError;
use crate::io::{ArtifactPaths, load_placements, write_forecast_csv};
use crate::models::ArimaModel;
use crate::plot::render_forecast_plot;

/// Run the full pipeline for `department` and write both artifacts.
///
/// The data file is re-read on every call.
pub fn run_forecast(config: &ServerConfig, department: &str) -> Result<ForecastResponse, AppError> {
    // 1) Load.
    let records = load_placements(&config.data_file).map_err(|e| {
        error!(path = %config.data_file.display(), error = %e, "failed to load placement data");
        AppError::internal(format!("Failed to load data: {e}"))
    })?;

    // 2) Index by year and sort.
    let table = PlacementTable::from_records(records)
        .map_err(|e| AppError::internal(format!("Failed to preprocess data: {e}")))?;
    debug!(rows = table.row_count(), departments = table.departments().len(), "placement table ready");

    // 3) Select the department.
    let series = table
        .series(department)
        .ok_or_else(|| AppError::not_found(format!("Department {department} not found")))?;

    // 4) Fit + forecast.
    let forecast = forecast_series(&series, PLACEMENT_ORDER, FORECAST_HORIZON)?;

    // 5) Artifacts. A failure in either fails the whole request.
    let paths = ArtifactPaths::for_config(config, department);
    render_forecast_plot(&paths.plot_path, &series, &forecast)?;
    write_forecast_csv(&paths.csv_path, &forecast)?;

    info!(
        department,
        history = series.len(),
        csv = %paths.csv_path.display(),
        plot = %paths.plot_path.display(),
        "forecast written"
    );

    Ok(ForecastResponse {
        department: department.to_string(),
        forecasted_placement: forecast.values(),
        csv_url: paths.csv_url(&config.public_url),
        plot_url: paths.plot_url(&config.public_url),
    })
}

/// Fit `order` to `series` and project `horizon` year-end points.
///
/// The first forecast date is December 31st of the last historical year,
/// followed by one year-end per step.
pub fn forecast_series(series: &PlacementSeries, order: ArimaOrder, horizon: usize) -> Result<ForecastResult, AppError> {
    let last = series
        .last_date()
        .ok_or_else(|| AppError::internal(format!("Department {} has no observations", series.department)))?;

    let model = ArimaModel::fit(order, &series.values())?;
    debug!(
        department = %series.department,
        order = %order,
        estimator = ?model.estimator(),
        coefficients = ?model.coefficients(),
        sigma2 = model.residual_variance(),
        "model fitted"
    );

    let values = model.forecast(horizon);
    let points = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let date = year_end(last.year() + i as i32).ok_or_else(|| {
                AppError::internal(format!("Forecast date out of range for step {}", i + 1))
            })?;
            Ok(ForecastPoint { date, value })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(ForecastResult {
        department: series.department.clone(),
        order,
        points,
    })
}

fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}
