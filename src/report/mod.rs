//! Terminal reports for the dashboard.

pub mod format;

pub use format::*;
