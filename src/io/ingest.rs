//! Raw value normalization.
//!
//! This module turns the source's string values into typed numbers:
//!
//! - rates and prices: `f64`, rounded to 6 decimal places
//! - coupons: `f64`, rounded to 2 decimal places
//! - days to maturity: grouping separators stripped, truncated to `i64`
//!
//! Only day counts use the grouping-separator convention. A comma inside a rate,
//! price or coupon is treated as malformed rather than silently stripped.
//!
//! No domain validation happens here (negative or zero day counts pass through).

use crate::domain::{CleanObservation, NumericKind, ObservationValue, RawObservation};
use crate::error::CurveError;

/// Parse one raw observation as `kind`.
pub fn normalize(raw: &RawObservation, kind: NumericKind) -> Result<CleanObservation, CurveError> {
    let value = parse_value(&raw.raw_value, kind).ok_or_else(|| CurveError::MalformedValue {
        series_id: raw.series_id.clone(),
        value: raw.raw_value.clone(),
    })?;

    Ok(CleanObservation {
        series_id: raw.series_id.clone(),
        date: raw.date.clone(),
        value,
    })
}

/// Normalize every observation of one facet with the same kind.
pub fn normalize_all(raws: &[RawObservation], kind: NumericKind) -> Result<Vec<CleanObservation>, CurveError> {
    raws.iter().map(|raw| normalize(raw, kind)).collect()
}

fn parse_value(raw: &str, kind: NumericKind) -> Option<ObservationValue> {
    match kind {
        NumericKind::Rate | NumericKind::Price => parse_decimal(raw).map(|v| ObservationValue::Float(round_to(v, 6))),
        NumericKind::Coupon => parse_decimal(raw).map(|v| ObservationValue::Float(round_to(v, 2))),
        NumericKind::DayCount => parse_day_count(raw).map(ObservationValue::Integer),
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// `"1,234.00"` -> `1234`.
fn parse_day_count(raw: &str) -> Option<i64> {
    let stripped: String = raw.trim().chars().filter(|&c| c != ',').collect();
    let v = parse_decimal(&stripped)?;
    let truncated = v.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Round half away from zero to `dp` decimal places.
pub fn round_to(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: &str) -> RawObservation {
        RawObservation::new("SF1", "20/10/2025", value)
    }

    fn clean(value: &str, kind: NumericKind) -> ObservationValue {
        normalize(&raw(value), kind).unwrap().value
    }

    #[test]
    fn day_counts_strip_grouping_separators() {
        assert_eq!(clean("1,234.00", NumericKind::DayCount), ObservationValue::Integer(1234));
        assert_eq!(clean("10,920.999999", NumericKind::DayCount), ObservationValue::Integer(10920));
        assert_eq!(clean("27", NumericKind::DayCount), ObservationValue::Integer(27));
    }

    #[test]
    fn day_counts_are_not_range_checked() {
        assert_eq!(clean("0", NumericKind::DayCount), ObservationValue::Integer(0));
        assert_eq!(clean("-3.000000", NumericKind::DayCount), ObservationValue::Integer(-3));
    }

    #[test]
    fn decimals_round_by_kind() {
        assert_eq!(clean("7.3999774", NumericKind::Rate), ObservationValue::Float(7.399977));
        assert_eq!(clean(" 98.1234567 ", NumericKind::Price), ObservationValue::Float(98.123457));
        assert_eq!(clean("8.000000", NumericKind::Coupon), ObservationValue::Float(8.0));
        assert_eq!(clean("7.756", NumericKind::Coupon), ObservationValue::Float(7.76));
    }

    #[test]
    fn malformed_values_carry_the_series() {
        for (value, kind) in [
            ("N/E", NumericKind::Rate),
            ("", NumericKind::Price),
            ("1,000.5", NumericKind::Price),
            ("abc", NumericKind::DayCount),
            ("inf", NumericKind::Coupon),
        ] {
            let err = normalize(&raw(value), kind).unwrap_err();
            assert_eq!(
                err,
                CurveError::MalformedValue {
                    series_id: "SF1".to_string(),
                    value: value.to_string(),
                }
            );
        }
    }

    #[test]
    fn normalize_all_stops_at_first_error() {
        let raws = vec![raw("7.1"), raw("N/E"), raw("oops")];
        let err = normalize_all(&raws, NumericKind::Rate).unwrap_err();
        assert!(matches!(err, CurveError::MalformedValue { value, .. } if value == "N/E"));
    }
}
