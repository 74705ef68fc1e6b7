//! Macro indicators shown next to the curve.

pub mod summary;

pub use summary::*;
