//! Error types.
//!
//! Two layers:
//!
//! - [`CurveError`]: failures of the curve/valuation core. Core functions return
//!   `Result<_, CurveError>` and never retry.
//! - [`AppError`]: what the binary reports. It carries a process exit code so
//!   `main` can stay tiny.
//!
//! Exit codes:
//! - `2` configuration / usage
//! - `3` data errors raised by the core
//! - `4` fetch or file I/O failures

use thiserror::Error;

use crate::domain::{Facet, InstrumentFamily};

/// Failures raised while turning raw observations into a curve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A raw value could not be parsed as the expected number.
    #[error("Malformed value '{value}' for series {series_id}")]
    MalformedValue { series_id: String, value: String },

    /// A reported date is not in `DD/MM/YYYY` form.
    #[error("Malformed date '{date}' for series {series_id}")]
    MalformedDate { series_id: String, date: String },

    /// A tenor label does not follow `<N>D` / `<N>Y`.
    #[error("Unknown maturity format: '{label}'")]
    UnknownMaturityFormat { label: String },

    /// Curve series disagree on their as-of date (or there were none).
    #[error("Curve series report inconsistent dates: [{}]", .dates.join(", "))]
    InconsistentCurveDates { dates: Vec<String> },

    /// The price-to-yield root finder failed.
    #[error(
        "Yield solver did not converge (price={price}, dtm={dtm}, coupon={coupon}): {reason}"
    )]
    YieldSolverDidNotConverge {
        price: f64,
        dtm: i64,
        coupon: f64,
        reason: String,
    },

    /// A series id is not present in the catalog table it was looked up in.
    #[error("Series {series_id} has no mapping in the {table} catalog")]
    MissingSeriesMapping { series_id: String, table: String },

    /// After reordering, a facet does not describe the same tenors as its family.
    #[error("{facet} facet of {family} does not line up with the family's tenors")]
    FacetMismatch {
        family: InstrumentFamily,
        facet: Facet,
    },

    /// The catalog configuration is unusable.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Application-level error with a process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        let exit_code = match err {
            CurveError::InvalidCatalog(_) => 2,
            _ => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
