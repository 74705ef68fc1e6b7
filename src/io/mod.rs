//! Input/output helpers.
//!
//! - raw value normalization (`ingest`)
//! - curve CSV export (`export`)
//! - dashboard JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
