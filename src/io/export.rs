//! Export forecast points to CSV.
//!
//! Layout is two columns, `Year` (ISO date) and `Forecasted_Placement`,
//! so the file opens cleanly in spreadsheets. Existing files are overwritten.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{ForecastPoint, ForecastResult};
use crate::error::AppError;

const HEADER: [&str; 2] = ["Year", "Forecasted_Placement"];

/// Write the forecast to `path`, replacing any previous content.
pub fn write_forecast_csv(path: &Path, forecast: &ForecastResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::internal(format!("Failed to write forecast CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(HEADER)
        .map_err(|e| AppError::internal(format!("Failed to write forecast CSV header: {e}")))?;

    for point in &forecast.points {
        writer
            .write_record([point.date.format("%Y-%m-%d").to_string(), point.value.to_string()])
            .map_err(|e| AppError::internal(format!("Failed to write forecast CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::internal(format!("Failed to write forecast CSV '{}': {e}", path.display())))?;

    Ok(())
}

/// Read a forecast CSV written by [`write_forecast_csv`].
pub fn read_forecast_csv(path: &Path) -> Result<Vec<ForecastPoint>, AppError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::internal(format!("Failed to open forecast CSV '{}': {e}", path.display())))?;

    let mut points = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::internal(format!("CSV parse error on line {line}: {e}")))?;
        let date = record
            .get(0)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .ok_or_else(|| AppError::internal(format!("Invalid `Year` on line {line}")))?;
        let value = record
            .get(1)
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| AppError::internal(format!("Invalid `Forecasted_Placement` on line {line}")))?;
        points.push(ForecastPoint { date, value });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PLACEMENT_ORDER;

    fn forecast(values: &[f64]) -> ForecastResult {
        ForecastResult {
            department: "Computer Science".to_string(),
            order: PLACEMENT_ORDER,
            points: values
                .iter()
                .enumerate()
                .map(|(i, &value)| ForecastPoint {
                    date: NaiveDate::from_ymd_opt(2023 + i as i32, 12, 31).unwrap(),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_forecast_csv(&path, &forecast(&[101.5, 102.25])).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Year,Forecasted_Placement\n2023-12-31,101.5\n2024-12-31,102.25\n"
        );
    }

    #[test]
    fn rewrite_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_forecast_csv(&path, &forecast(&[1.0, 2.0, 3.0])).unwrap();
        write_forecast_csv(&path, &forecast(&[9.0])).unwrap();

        let points = read_forecast_csv(&path).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 9.0);
    }

    #[test]
    fn values_survive_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let fc = forecast(&[0.1 + 0.2, 1.0 / 3.0, 123456.789]);
        write_forecast_csv(&path, &fc).unwrap();

        let points = read_forecast_csv(&path).unwrap();
        assert_eq!(points, fc.points);
    }
}
