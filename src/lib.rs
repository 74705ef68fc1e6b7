//! `govt-curves` library crate.
//!
//! The binary (`gc`) is a thin wrapper around this library so that:
//!
//! - the curve core is testable without spawning processes or touching the network
//! - the fetch collaborator can be swapped for recorded observations

pub mod app;
pub mod cli;
pub mod curve;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
