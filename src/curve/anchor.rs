//! As-of date resolution.
//!
//! Curve series are fetched independently, so nothing guarantees they describe
//! the same day. The curve is only built when every contributing observation
//! reports the same date; any disagreement is fatal (no majority vote, no
//! interpolation).

use std::collections::BTreeSet;

use chrono::{Days, Months, NaiveDate};

use crate::domain::CleanObservation;
use crate::error::CurveError;

/// Date format used by the source.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";
/// Date format used in range queries.
pub const SORTABLE_FORMAT: &str = "%Y-%m-%d";

/// Trailing window for the year-over-year indicator, in calendar months.
const LOOKBACK_MONTHS: u32 = 2;

/// The single date every curve series reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AnchorDate(NaiveDate);

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnchorDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// `DD/MM/YYYY`, as the source reports it.
    pub fn display(self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }

    /// `YYYY-MM-DD`, for query construction.
    pub fn sortable(self) -> String {
        self.0.format(SORTABLE_FORMAT).to_string()
    }

    /// `(anchor - 2 months) + 1 day ..= anchor`.
    ///
    /// Month subtraction clamps to the end of the target month
    /// (`30/04` - 2 months = `28/02`).
    pub fn lookback_window(self) -> LookbackWindow {
        let start = self
            .0
            .checked_sub_months(Months::new(LOOKBACK_MONTHS))
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .unwrap_or(NaiveDate::MIN);
        LookbackWindow { start, end: self.0 }
    }
}

impl LookbackWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parse a source `DD/MM/YYYY` date.
pub fn parse_source_date(series_id: &str, date: &str) -> Result<NaiveDate, CurveError> {
    NaiveDate::parse_from_str(date.trim(), DISPLAY_FORMAT).map_err(|_| CurveError::MalformedDate {
        series_id: series_id.to_string(),
        date: date.to_string(),
    })
}

/// Resolve the anchor date from every curve-contributing observation.
pub fn resolve_anchor<'a, I>(observations: I) -> Result<AnchorDate, CurveError>
where
    I: IntoIterator<Item = &'a CleanObservation>,
{
    let mut dates = BTreeSet::new();
    for obs in observations {
        dates.insert(parse_source_date(&obs.series_id, &obs.date)?);
    }

    let mut iter = dates.iter();
    match (iter.next(), iter.next()) {
        (Some(&only), None) => Ok(AnchorDate(only)),
        _ => Err(CurveError::InconsistentCurveDates {
            dates: dates
                .iter()
                .map(|d| d.format(DISPLAY_FORMAT).to_string())
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationValue;

    fn obs(id: &str, date: &str) -> CleanObservation {
        CleanObservation {
            series_id: id.to_string(),
            date: date.to_string(),
            value: ObservationValue::Float(7.0),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_date_resolves() {
        let all = vec![obs("A", "20/10/2025"), obs("B", "20/10/2025"), obs("C", "20/10/2025")];
        let anchor = resolve_anchor(&all).unwrap();
        assert_eq!(anchor, AnchorDate::new(ymd(2025, 10, 20)));
        assert_eq!(anchor.display(), "20/10/2025");
        assert_eq!(anchor.sortable(), "2025-10-20");
    }

    #[test]
    fn single_digit_day_and_month_parse() {
        let anchor = resolve_anchor(&[obs("A", "1/9/2025")]).unwrap();
        assert_eq!(anchor.display(), "01/09/2025");
    }

    #[test]
    fn mismatched_dates_fail() {
        let all = vec![obs("A", "21/10/2025"), obs("B", "20/10/2025"), obs("C", "21/10/2025")];
        assert_eq!(
            resolve_anchor(&all).unwrap_err(),
            CurveError::InconsistentCurveDates {
                dates: vec!["20/10/2025".to_string(), "21/10/2025".to_string()],
            }
        );
    }

    #[test]
    fn no_dates_fail() {
        let none: Vec<CleanObservation> = Vec::new();
        assert_eq!(
            resolve_anchor(&none).unwrap_err(),
            CurveError::InconsistentCurveDates { dates: vec![] }
        );
    }

    #[test]
    fn unparseable_date_fails() {
        let err = resolve_anchor(&[obs("A", "2025-10-20")]).unwrap_err();
        assert_eq!(
            err,
            CurveError::MalformedDate {
                series_id: "A".to_string(),
                date: "2025-10-20".to_string(),
            }
        );
    }

    #[test]
    fn lookback_window_spans_two_months() {
        let window = AnchorDate::new(ymd(2025, 10, 27)).lookback_window();
        assert_eq!(window.start, ymd(2025, 8, 28));
        assert_eq!(window.end, ymd(2025, 10, 27));
        assert!(window.contains(ymd(2025, 9, 1)));
        assert!(!window.contains(ymd(2025, 8, 27)));
    }

    #[test]
    fn lookback_window_clamps_month_end() {
        let window = AnchorDate::new(ymd(2025, 4, 30)).lookback_window();
        assert_eq!(window.start, ymd(2025, 3, 1));

        let window = AnchorDate::new(ymd(2026, 1, 15)).lookback_window();
        assert_eq!(window.start, ymd(2025, 11, 16));
    }
}
