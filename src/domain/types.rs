//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - returned from the HTTP handlers unchanged

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Departments advertised by the listing endpoint.
///
/// The list is fixed; it is not derived from the data file.
pub const LISTED_DEPARTMENTS: [&str; 4] = [
    "Computer Science",
    "Mechanical Engineering",
    "Electrical Engineering",
    "Civil Engineering",
];

/// Number of future periods forecast per request.
pub const FORECAST_HORIZON: usize = 12;

/// Model order used for every department.
pub const PLACEMENT_ORDER: ArimaOrder = ArimaOrder { p: 5, d: 1, q: 0 };

/// One row of the placement CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub year: i32,
    pub department: String,
    pub placed_students: f64,
}

/// Chronologically ordered placement counts for one department.
///
/// Duplicate years are not collapsed; they keep their file order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSeries {
    pub department: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl PlacementSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|&(d, _)| d)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// ARIMA `(p, d, q)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive terms.
    pub p: usize,
    /// Differencing passes.
    pub d: usize,
    /// Moving-average terms.
    pub q: usize,
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// A single forecast value and the year-end date it is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Forecast produced for one department.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub department: String,
    pub order: ArimaOrder,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// JSON body returned by the forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub department: String,
    pub forecasted_placement: Vec<f64>,
    pub csv_url: String,
    pub plot_url: String,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Source CSV; re-read on every forecast request.
    pub data_file: PathBuf,
    /// Directory receiving `<department>_forecast_data.csv` files.
    pub csv_dir: PathBuf,
    /// Directory receiving `<department>_forecast_plot.png` files.
    pub plot_dir: PathBuf,
    /// Base used when building URLs in responses (no trailing slash).
    pub public_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_accessors() {
        let series = PlacementSeries {
            department: "Civil Engineering".to_string(),
            points: vec![
                (NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(), 10.0),
                (NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 12.0),
            ],
        };
        assert_eq!(series.values(), vec![10.0, 12.0]);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn order_display() {
        assert_eq!(PLACEMENT_ORDER.to_string(), "(5, 1, 0)");
    }
}
