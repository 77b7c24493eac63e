//! PNG rendering of historical placements vs. forecast.
//!
//! Plot elements:
//! - historical series: solid blue line ("Previous Placement")
//! - forecast: dashed red line ("Forecasted Placement")
//!
//! Both share an x axis in decimal years, so the forecast's year-end dates
//! sit just before the following January 1st.
//!
//! Text uses DejaVu Sans compiled into the binary, so rendering does not
//! depend on fonts installed on the host.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use plotters::style::register_font;

use crate::domain::{ForecastResult, PlacementSeries};
use crate::error::AppError;

/// Output image size in pixels.
pub const PLOT_SIZE: (u32, u32) = (1400, 700);

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Register the bundled font with Plotters once per process.
fn ensure_font() -> Result<(), AppError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED.get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ok {
        Ok(())
    } else {
        Err(AppError::internal("Failed to render plot: bundled font could not be loaded"))
    }
}

/// Render the comparison chart to `path`, overwriting any existing file.
pub fn render_forecast_plot(path: &Path, series: &PlacementSeries, forecast: &ForecastResult) -> Result<(), AppError> {
    let history: Vec<(f64, f64)> = series.points.iter().map(|&(d, v)| (decimal_year(d), v)).collect();
    let projected: Vec<(f64, f64)> = forecast
        .points
        .iter()
        .map(|p| (decimal_year(p.date), p.value))
        .collect();

    let (x_range, y_range) = chart_bounds(&history, &projected)
        .ok_or_else(|| AppError::internal("Failed to render plot: no finite points to draw"))?;

    ensure_font()?;

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Forecasted Placement for {}", series.department), (FONT_FAMILY, 32))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| draw_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Forecasted Placement")
        .x_labels(12)
        .y_labels(8)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style((FONT_FAMILY, 14))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    chart
        .draw_series(LineSeries::new(history.iter().copied(), BLUE.stroke_width(2)))
        .map_err(|e| draw_err(path, e))?
        .label("Previous Placement")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(DashedLineSeries::new(projected.iter().copied(), 10, 6, RED.stroke_width(2)))
        .map_err(|e| draw_err(path, e))?
        .label("Forecasted Placement")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT_FAMILY, 14))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))?;
    Ok(())
}

fn draw_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("Failed to render plot '{}': {e}", path.display()))
}

/// Fractional year position of `date` (Jan 1 is the integer year).
pub fn decimal_year(date: NaiveDate) -> f64 {
    let days_in_year = NaiveDate::from_ymd_opt(date.year(), 12, 31)
        .map(|d| d.ordinal())
        .unwrap_or(365);
    date.year() as f64 + date.ordinal0() as f64 / days_in_year as f64
}

type Bounds = (std::ops::Range<f64>, std::ops::Range<f64>);

fn chart_bounds(history: &[(f64, f64)], projected: &[(f64, f64)]) -> Option<Bounds> {
    let mut x0 = f64::INFINITY;
    let mut x1 = f64::NEG_INFINITY;
    let mut y0 = f64::INFINITY;
    let mut y1 = f64::NEG_INFINITY;

    for &(x, y) in history.iter().chain(projected) {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }

    if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) {
        return None;
    }

    // Degenerate ranges (single point, flat line) still need a drawable span.
    if x1 - x0 < 1e-9 {
        x0 -= 0.5;
        x1 += 0.5;
    }
    let pad = ((y1 - y0) * 0.05).max(1.0);

    Some((x0..x1, (y0 - pad)..(y1 + pad)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, PLACEMENT_ORDER};

    fn sample() -> (PlacementSeries, ForecastResult) {
        let series = PlacementSeries {
            department: "Computer Science".to_string(),
            points: (2010..2022)
                .map(|y| (NaiveDate::from_ymd_opt(y, 1, 1).unwrap(), 100.0 + (y - 2010) as f64 * 3.0))
                .collect(),
        };
        let forecast = ForecastResult {
            department: "Computer Science".to_string(),
            order: PLACEMENT_ORDER,
            points: (0..12)
                .map(|i| ForecastPoint {
                    date: NaiveDate::from_ymd_opt(2021 + i, 12, 31).unwrap(),
                    value: 133.0 + i as f64,
                })
                .collect(),
        };
        (series, forecast)
    }

    #[test]
    fn decimal_year_positions() {
        let jan1 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let dec31 = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        assert_eq!(decimal_year(jan1), 2021.0);
        let end = decimal_year(dec31);
        assert!(end > 2021.99 && end < 2022.0, "got {end}");
    }

    #[test]
    fn bounds_pad_flat_series() {
        let (x, y) = chart_bounds(&[(2020.0, 5.0)], &[]).unwrap();
        assert!(x.end > x.start);
        assert!(y.end > y.start);
        assert!(chart_bounds(&[(f64::NAN, 1.0)], &[]).is_none());
    }

    #[test]
    fn writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Computer Science_forecast_plot.png");
        let (series, forecast) = sample();

        render_forecast_plot(&path, &series, &forecast).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']), "not a PNG header");
    }

    #[test]
    fn repeated_renders_reuse_registered_font() {
        let dir = tempfile::tempdir().unwrap();
        let (series, forecast) = sample();
        for name in ["a.png", "b.png", "a.png"] {
            render_forecast_plot(&dir.path().join(name), &series, &forecast).unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn bundled_font_lays_out_text() {
        ensure_font().unwrap();
        let font: FontDesc = (FONT_FAMILY, 14).into_font();
        let (w, h) = font.box_size("Forecasted Placement").unwrap();
        assert!(w > 0 && h > 0, "empty text box {w}x{h}");
    }
}
