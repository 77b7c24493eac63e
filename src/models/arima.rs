//! ARIMA(p, d, 0) fitting and forecasting.
//!
//! Fitting proceeds in three steps:
//!
//! 1. difference the series `d` times
//! 2. estimate AR(p) coefficients on the differenced series by conditional
//!    least squares (no constant term)
//! 3. if those coefficients are non-stationary, or the least-squares solve
//!    fails, fall back to Yule–Walker estimates
//!
//! Forecasts run the AR recursion on the differenced scale and are then
//! integrated back to the original scale.

use nalgebra::{DMatrix, DVector};

use crate::domain::ArimaOrder;
use crate::error::ForecastError;
use crate::math::{
    autocovariance, difference, difference_tails, integrate, is_stationary, levinson_durbin, solve_least_squares,
};

/// How the AR coefficients of a fitted model were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    ConditionalLeastSquares,
    YuleWalker,
}

/// A fitted ARIMA model.
#[derive(Debug, Clone)]
pub struct ArimaModel {
    phi: Vec<f64>,
    estimator: Estimator,
    differenced: Vec<f64>,
    tails: Vec<f64>,
    sigma2: f64,
}

impl ArimaModel {
    /// Smallest series length accepted for `order`.
    ///
    /// The differenced series must hold at least `p` values. Series too short
    /// for a well-posed least-squares regression are fitted by Yule–Walker.
    pub fn min_observations(order: ArimaOrder) -> usize {
        (order.p + order.d).max(order.d + 1)
    }

    pub fn fit(order: ArimaOrder, data: &[f64]) -> Result<Self, ForecastError> {
        if order.q > 0 {
            return Err(ForecastError::Unsupported(format!(
                "{order}: moving-average terms are not supported"
            )));
        }

        let required = Self::min_observations(order);
        if data.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: data.len(),
            });
        }

        if data.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData(
                "series contains NaN or infinite values".to_string(),
            ));
        }

        let differenced = difference(data, order.d);
        let tails = difference_tails(data, order.d);

        let (phi, estimator) = match conditional_least_squares(&differenced, order.p) {
            Some(phi) if is_stationary(&phi) => (phi, Estimator::ConditionalLeastSquares),
            _ => {
                let gamma = autocovariance(&differenced, order.p);
                (levinson_durbin(&gamma, order.p), Estimator::YuleWalker)
            }
        };

        let sigma2 = residual_variance(&differenced, &phi);
        if !sigma2.is_finite() {
            return Err(ForecastError::InvalidData(
                "fitted model produced non-finite residuals".to_string(),
            ));
        }

        Ok(Self {
            phi,
            estimator,
            differenced,
            tails,
            sigma2,
        })
    }

    /// Project `steps` values beyond the end of the fitted series.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        if steps == 0 {
            return Vec::new();
        }

        let p = self.phi.len();
        let mut extended = self.differenced.clone();
        let n = extended.len();

        for _ in 0..steps {
            let len = extended.len();
            let next: f64 = (0..p).map(|j| self.phi[j] * extended[len - 1 - j]).sum();
            extended.push(next);
        }

        integrate(&extended[n..], &self.tails)
    }

    /// AR coefficients `φ1..φp` (lag 1 first).
    pub fn coefficients(&self) -> &[f64] {
        &self.phi
    }

    pub fn estimator(&self) -> Estimator {
        self.estimator
    }

    /// Mean squared one-step residual on the differenced scale.
    pub fn residual_variance(&self) -> f64 {
        self.sigma2
    }
}

/// Regress `x_t` on `x_{t-1}, …, x_{t-p}` for `t = p..n`.
///
/// Returns `None` when there are fewer than `p` rows.
fn conditional_least_squares(x: &[f64], p: usize) -> Option<Vec<f64>> {
    if p == 0 {
        return Some(Vec::new());
    }
    let rows = x.len().checked_sub(p).filter(|&r| r >= p)?;

    let design = DMatrix::from_fn(rows, p, |i, j| x[p + i - 1 - j]);
    let target = DVector::from_fn(rows, |i, _| x[p + i]);

    solve_least_squares(&design, &target).map(|beta| beta.iter().copied().collect())
}

fn residual_variance(x: &[f64], phi: &[f64]) -> f64 {
    let p = phi.len();
    if x.len() <= p {
        return 0.0;
    }
    let sse: f64 = (p..x.len())
        .map(|t| {
            let fit: f64 = (0..p).map(|j| phi[j] * x[t - 1 - j]).sum();
            let r = x[t] - fit;
            r * r
        })
        .sum();
    sse / (x.len() - p) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PLACEMENT_ORDER;

    /// Deterministic uniform noise in [-0.5, 0.5).
    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
            })
            .collect()
    }

    /// Integrated AR(1) path: the first differences follow `x_t = φ x_{t-1} + e_t`.
    fn integrated_ar1(phi: f64, n: usize) -> Vec<f64> {
        let e = noise(n, 7);
        let mut level = 100.0;
        let mut prev = 0.0;
        let mut out = Vec::with_capacity(n);
        for shock in e {
            let diff = phi * prev + shock;
            level += diff;
            prev = diff;
            out.push(level);
        }
        out
    }

    #[test]
    fn recovers_ar1_coefficient() {
        let data = integrated_ar1(0.5, 600);
        let order = ArimaOrder { p: 1, d: 1, q: 0 };
        let model = ArimaModel::fit(order, &data).unwrap();

        assert_eq!(model.estimator(), Estimator::ConditionalLeastSquares);
        let phi = model.coefficients()[0];
        assert!((phi - 0.5).abs() < 0.1, "phi should be near 0.5, got {phi}");
        assert!(model.residual_variance() > 0.0);
    }

    #[test]
    fn placement_order_forecasts_full_horizon() {
        let data: Vec<f64> = (0..15)
            .map(|i| 120.0 + 4.0 * i as f64 + (i as f64 * 1.3).sin() * 6.0)
            .collect();
        let model = ArimaModel::fit(PLACEMENT_ORDER, &data).unwrap();
        let fc = model.forecast(12);

        assert_eq!(fc.len(), 12);
        assert!(fc.iter().all(|v| v.is_finite()));
        assert!(is_stationary(model.coefficients()));
    }

    #[test]
    fn constant_increments_fall_back_to_yule_walker() {
        // Differences are all 3.0: least squares puts the AR roots on the unit
        // circle, so the stationary Yule-Walker estimate (all zeros) is used.
        let data: Vec<f64> = (0..12).map(|i| 10.0 + 3.0 * i as f64).collect();
        let model = ArimaModel::fit(PLACEMENT_ORDER, &data).unwrap();

        assert_eq!(model.estimator(), Estimator::YuleWalker);
        let fc = model.forecast(4);
        for v in fc {
            assert!((v - 43.0).abs() < 1e-9, "expected flat forecast at 43, got {v}");
        }
    }

    #[test]
    fn forecast_continues_from_last_level() {
        // d = 1 with p = 0: differences forecast to zero, so the level is flat.
        let order = ArimaOrder { p: 0, d: 1, q: 0 };
        let model = ArimaModel::fit(order, &[1.0, 5.0, 2.0]).unwrap();
        assert_eq!(model.forecast(3), vec![2.0, 2.0, 2.0]);
        assert!(model.forecast(0).is_empty());
    }

    #[test]
    fn short_series_is_rejected() {
        let err = ArimaModel::fit(PLACEMENT_ORDER, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                required: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn six_points_fit_by_yule_walker() {
        let data = [120.0, 126.0, 125.0, 133.0, 131.0, 140.0];
        assert_eq!(ArimaModel::min_observations(PLACEMENT_ORDER), 6);

        let model = ArimaModel::fit(PLACEMENT_ORDER, &data).unwrap();
        assert_eq!(model.estimator(), Estimator::YuleWalker);
        assert!(is_stationary(model.coefficients()));

        let fc = model.forecast(12);
        assert_eq!(fc.len(), 12);
        assert!(fc.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn underdetermined_regression_defers_to_yule_walker() {
        // Ten points leave nine differences: four regression rows for five lags.
        let data: Vec<f64> = (0..10).map(|i| 50.0 + 2.0 * i as f64 + (i as f64 * 0.9).cos()).collect();
        let model = ArimaModel::fit(PLACEMENT_ORDER, &data).unwrap();
        assert_eq!(model.estimator(), Estimator::YuleWalker);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut data: Vec<f64> = (0..12).map(|i| i as f64).collect();
        data[4] = f64::NAN;
        let err = ArimaModel::fit(PLACEMENT_ORDER, &data).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidData(_)));
    }

    #[test]
    fn moving_average_terms_are_unsupported() {
        let order = ArimaOrder { p: 1, d: 1, q: 1 };
        let data: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert!(matches!(
            ArimaModel::fit(order, &data),
            Err(ForecastError::Unsupported(_))
        ));
    }
}
