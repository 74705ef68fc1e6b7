//! External data sources.

pub mod banxico;
