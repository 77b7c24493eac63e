//! Loaded-table preprocessing: year index, chronological sort, department series.

pub mod series;

pub use series::*;
