//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed input rows (`PlacementRecord`) and per-department series
//! - the fixed model order and horizon
//! - forecast outputs and the JSON response shape
//! - the resolved server configuration

pub mod types;

pub use types::*;
