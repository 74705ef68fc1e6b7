//! Tenor resolution and maturity ordering.
//!
//! The source returns series in its own order, and a different order for each
//! facet. Instead of trusting positions we resolve every observation to its
//! tenor through the facet's catalog and sort by tenor length in days.
//!
//! Years are converted with a 364-day year. This is the source's convention and
//! downstream comparisons rely on the exact value; do not change it to 365.

use crate::domain::{CleanObservation, FacetCatalog, Tenor, TenorUnit};
use crate::error::CurveError;

/// Days in a tenor "year".
pub const DAYS_PER_TENOR_YEAR: i64 = 364;

/// Parse a `<N>D` / `<N>Y` label (unit is case-insensitive).
pub fn parse_tenor(label: &str) -> Result<Tenor, CurveError> {
    let unknown = || CurveError::UnknownMaturityFormat {
        label: label.to_string(),
    };

    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    let unit = match chars.next_back().map(|c| c.to_ascii_uppercase()) {
        Some('D') => TenorUnit::Days,
        Some('Y') => TenorUnit::Years,
        _ => return Err(unknown()),
    };

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unknown());
    }
    let count = digits.parse::<u32>().map_err(|_| unknown())?;

    Ok(Tenor { count, unit })
}

impl Tenor {
    pub fn days(self) -> i64 {
        match self.unit {
            TenorUnit::Days => i64::from(self.count),
            TenorUnit::Years => i64::from(self.count) * DAYS_PER_TENOR_YEAR,
        }
    }
}

/// Tenor label to nominal days (`"2Y"` -> 728).
pub fn convert_tenor_to_days(label: &str) -> Result<i64, CurveError> {
    parse_tenor(label).map(Tenor::days)
}

/// Permutation that puts `observations` in ascending tenor order.
///
/// The sort is stable, so observations resolving to the same number of days keep
/// their relative input order.
pub fn maturity_rank(
    observations: &[CleanObservation],
    catalog: &FacetCatalog,
) -> Result<Vec<usize>, CurveError> {
    let mut keyed = Vec::with_capacity(observations.len());
    for (idx, obs) in observations.iter().enumerate() {
        let label = catalog.tenor_label(&obs.series_id)?;
        keyed.push((idx, convert_tenor_to_days(label)?));
    }

    keyed.sort_by_key(|&(_, days)| days);
    Ok(keyed.into_iter().map(|(idx, _)| idx).collect())
}

/// Reorder `items` by a permutation from [`maturity_rank`].
///
/// # Panics
/// Panics if `rank` holds an index out of bounds for `items`.
pub fn apply_rank<T: Clone>(items: &[T], rank: &[usize]) -> Vec<T> {
    rank.iter().map(|&idx| items[idx].clone()).collect()
}
