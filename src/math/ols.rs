//! Least squares solver.
//!
//! The AR fit reduces to a small regression problem:
//!
//! ```text
//! minimize Σ (y_t - x_t^T φ)^2,   x_t = (y_{t-1}, …, y_{t-p})
//! ```
//!
//! Implementation choices:
//! - SVD handles tall design matrices (more rows than columns) directly.
//!   (Nalgebra's `QR::solve` is intended for square systems.)
//! - Nearly collinear lag columns are common for short, smooth series, so we
//!   retry with looser singular-value tolerances before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
