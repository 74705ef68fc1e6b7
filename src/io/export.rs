//! Export the assembled curve to CSV.

use std::path::Path;

use serde::Serialize;

use crate::domain::CurveOutput;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct CurveRow<'a> {
    label: &'a str,
    date: &'a str,
    #[serde(rename = "yield")]
    yield_: f64,
    days_to_maturity: i64,
    price: f64,
}

/// Write one row per curve point: `label,date,yield,days_to_maturity,price`.
pub fn write_curve_csv(path: &Path, curve: &CurveOutput) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_rows(&mut writer, curve)?;
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV: {e}")))?;
    Ok(())
}

fn write_rows<W: std::io::Write>(writer: &mut csv::Writer<W>, curve: &CurveOutput) -> Result<(), AppError> {
    for i in 0..curve.len() {
        writer
            .serialize(CurveRow {
                label: &curve.labels[i],
                date: &curve.dates[i],
                yield_: curve.yields[i],
                days_to_maturity: curve.days_to_maturity[i],
                price: curve.prices[i],
            })
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}
