//! Chart rendering for forecast artifacts.

pub mod png;

pub use png::*;
