//! Time-series primitives used by the ARIMA fitter.
//!
//! - differencing and its inverse (integration)
//! - sample autocovariance
//! - Yule–Walker AR estimates via Levinson–Durbin
//! - AR stationarity test via step-down recursion to partial autocorrelations

/// Threshold below which a variance is treated as zero.
const VAR_EPS: f64 = 1e-12;

/// Partial autocorrelations this close to ±1 count as a unit root.
const UNIT_ROOT_MARGIN: f64 = 1e-8;

/// Apply first differences `order` times.
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut out = data.to_vec();
    for _ in 0..order {
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Last value of each differencing level `0..order` (level 0 is the raw data).
///
/// These are the anchors [`integrate`] needs to undo the differencing.
pub fn difference_tails(data: &[f64], order: usize) -> Vec<f64> {
    let mut tails = Vec::with_capacity(order);
    let mut level = data.to_vec();
    for _ in 0..order {
        match level.last() {
            Some(&v) => tails.push(v),
            None => break,
        }
        level = difference(&level, 1);
    }
    tails
}

/// Undo differencing for values that continue a differenced series.
pub fn integrate(diffs: &[f64], tails: &[f64]) -> Vec<f64> {
    let mut out = diffs.to_vec();
    for &anchor in tails.iter().rev() {
        let mut acc = anchor;
        for v in out.iter_mut() {
            acc += *v;
            *v = acc;
        }
    }
    out
}

/// Biased sample autocovariances `γ(0..=max_lag)` around the mean.
pub fn autocovariance(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return vec![0.0; max_lag + 1];
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    (0..=max_lag)
        .map(|k| {
            if k >= n {
                return 0.0;
            }
            let sum: f64 = (k..n).map(|i| (data[i] - mean) * (data[i - k] - mean)).sum();
            sum / n as f64
        })
        .collect()
}

/// Yule–Walker AR(p) coefficients from autocovariances `γ(0..=p)`.
///
/// The biased autocovariance sequence is positive semi-definite, so the
/// result is always stationary. A zero-variance input yields all zeros.
pub fn levinson_durbin(gamma: &[f64], p: usize) -> Vec<f64> {
    let mut phi = vec![0.0; p];
    if p == 0 || gamma.len() <= p {
        return phi;
    }

    let mut v = gamma[0];
    for k in 1..=p {
        if v.abs() < VAR_EPS {
            break;
        }
        let mut acc = gamma[k];
        for j in 1..k {
            acc -= phi[j - 1] * gamma[k - j];
        }
        let kappa = acc / v;

        let prev = phi.clone();
        for j in 1..k {
            phi[j - 1] = prev[j - 1] - kappa * prev[k - j - 1];
        }
        phi[k - 1] = kappa;
        v *= 1.0 - kappa * kappa;
    }
    phi
}

/// Whether the AR polynomial `1 - φ1 z - … - φp z^p` has all roots outside
/// the unit circle.
///
/// Runs the Levinson recursion backwards; the process is stationary iff every
/// partial autocorrelation has magnitude strictly below one (with a small
/// margin, so numerically-unit roots are rejected too).
pub fn is_stationary(phi: &[f64]) -> bool {
    if phi.iter().any(|v| !v.is_finite()) {
        return false;
    }
    let mut cur = phi.to_vec();
    for k in (1..=cur.len()).rev() {
        let kk = cur[k - 1];
        if kk.abs() >= 1.0 - UNIT_ROOT_MARGIN {
            return false;
        }
        let denom = 1.0 - kk * kk;
        let prev: Vec<f64> = (0..k - 1)
            .map(|i| (cur[i] + kk * cur[k - 2 - i]) / denom)
            .collect();
        cur = prev;
    }
    true
}
