//! Summary panel parsing.
//!
//! Most indicators are published daily and reported as-is. Year-over-year
//! statistics are monthly, so they are fetched over a trailing window and the
//! most recent point inside it is reported with a `"<Month> <Year-1> -
//! <Month> <Year>"` label.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::curve::anchor::parse_source_date;
use crate::domain::{IndicatorKind, NumericKind, RawObservation, SummaryCatalog, SummaryMetric};
use crate::error::CurveError;
use crate::io::ingest::normalize;

/// Name given to series missing from the summary catalog.
pub const UNKNOWN_METRIC: &str = "Unknown";

/// Indicator name -> metric.
pub type Summary = BTreeMap<String, SummaryMetric>;

/// Turn raw indicator observations into the summary panel.
///
/// Series ids not in `catalog` are kept under [`UNKNOWN_METRIC`] and handled as
/// immediate indicators.
pub fn parse_summary(observations: &[RawObservation], catalog: &SummaryCatalog) -> Result<Summary, CurveError> {
    let mut summary = Summary::new();

    for (series_id, group) in group_by_series(observations) {
        let (name, kind) = match catalog.resolve(series_id) {
            Some(spec) => (spec.name.as_str(), spec.kind),
            None => {
                warn!(series_id, "series not in summary catalog");
                (UNKNOWN_METRIC, IndicatorKind::Immediate)
            }
        };

        let metric = match kind {
            IndicatorKind::Immediate => immediate(name, group[0])?,
            IndicatorKind::YearOverYear => year_over_year(name, &group)?,
        };
        summary.insert(name.to_string(), metric);
    }

    Ok(summary)
}

/// Groups in first-seen order; each group is non-empty.
fn group_by_series(observations: &[RawObservation]) -> Vec<(&str, Vec<&RawObservation>)> {
    let mut groups: Vec<(&str, Vec<&RawObservation>)> = Vec::new();
    for obs in observations {
        match groups.iter_mut().find(|(id, _)| *id == obs.series_id) {
            Some((_, group)) => group.push(obs),
            None => groups.push((obs.series_id.as_str(), vec![obs])),
        }
    }
    groups
}

fn immediate(name: &str, obs: &RawObservation) -> Result<SummaryMetric, CurveError> {
    let clean = normalize(obs, NumericKind::Rate)?;
    Ok(SummaryMetric {
        name: name.to_string(),
        value: clean.value.as_f64(),
        date: clean.date,
    })
}

fn year_over_year(name: &str, group: &[&RawObservation]) -> Result<SummaryMetric, CurveError> {
    let first = group[0];
    let (mut date, mut obs) = (parse_source_date(&first.series_id, &first.date)?, first);
    for &candidate in &group[1..] {
        let candidate_date = parse_source_date(&candidate.series_id, &candidate.date)?;
        // Later entries win ties.
        if candidate_date >= date {
            date = candidate_date;
            obs = candidate;
        }
    }

    let clean = normalize(obs, NumericKind::Rate)?;
    Ok(SummaryMetric {
        name: name.to_string(),
        value: clean.value.as_f64(),
        date: year_over_year_label(date),
    })
}

/// `"September 2024 - September 2025"` for any date in September 2025.
pub fn year_over_year_label(date: NaiveDate) -> String {
    let month = date.format("%B");
    format!("{month} {} - {month} {}", date.year() - 1, date.year())
}
