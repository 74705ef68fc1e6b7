//! Core domain types and catalogs.

pub mod catalog;
pub mod config;
pub mod types;

pub use catalog::*;
pub use config::*;
pub use types::*;
