//! Numerical utilities.

pub mod solver;

pub use solver::*;
