//! Forecasting models.
//!
//! Only ARIMA with a fixed order is used today; the model is kept free of any
//! I/O so the pipeline and tests can drive it directly.

pub mod arima;

pub use arima::*;
