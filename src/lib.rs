//! `placement-forecast` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - the router can be driven directly in integration tests
//! - the HTTP server and the offline CLI share one code path

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod server;
