//! Read/write dashboard JSON files.
//!
//! The JSON file is the serialized `domain::Dashboard`: anchor date, the curve
//! as parallel arrays and the summary panel. `gc plot` reads it back.

use std::fs::File;
use std::path::Path;

use crate::domain::Dashboard;
use crate::error::AppError;

/// Write a dashboard JSON file.
pub fn write_dashboard_json(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create dashboard JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, dashboard)
        .map_err(|e| AppError::new(4, format!("Failed to write dashboard JSON: {e}")))?;
    Ok(())
}

/// Read a dashboard JSON file.
pub fn read_dashboard_json(path: &Path) -> Result<Dashboard, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(4, format!("Failed to open dashboard JSON '{}': {e}", path.display())))?;
    let dashboard: Dashboard =
        serde_json::from_reader(file).map_err(|e| AppError::new(3, format!("Invalid dashboard JSON: {e}")))?;
    dashboard_is_consistent(&dashboard)?;
    Ok(dashboard)
}

/// The curve's parallel arrays must have equal lengths.
fn dashboard_is_consistent(dashboard: &Dashboard) -> Result<(), AppError> {
    let c = &dashboard.curve;
    let n = c.labels.len();
    if [c.dates.len(), c.yields.len(), c.days_to_maturity.len(), c.prices.len()]
        .iter()
        .any(|&len| len != n)
    {
        return Err(AppError::new(3, "Invalid dashboard JSON: curve arrays differ in length."));
    }
    Ok(())
}
