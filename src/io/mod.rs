//! Input/output helpers.
//!
//! - placement CSV ingest (`ingest`)
//! - forecast CSV export (`export`)
//! - artifact naming and URLs (`artifacts`)

pub mod artifacts;
pub mod export;
pub mod ingest;

pub use artifacts::*;
pub use export::*;
pub use ingest::*;
