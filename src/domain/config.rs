//! Run configuration for `gc curve`.

use std::path::PathBuf;

use chrono::NaiveDate;

/// Options of a single dashboard run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveConfig {
    /// Build the curve for this date instead of the latest published one.
    pub date: Option<NaiveDate>,
    /// Catalog file replacing the bundled one.
    pub catalog: Option<PathBuf>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
