//! Numerical utilities: least squares and time-series primitives.

pub mod ols;
pub mod timeseries;

pub use ols::*;
pub use timeseries::*;
