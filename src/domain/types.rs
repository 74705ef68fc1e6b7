//! Shared domain types.
//!
//! Raw records come in from the fetch collaborator as strings; everything after
//! normalization is typed. Output types only carry primitives so they can be:
//!
//! - printed / plotted in the terminal
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One `(series id, date, value)` observation exactly as the source reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub series_id: String,
    /// `DD/MM/YYYY`.
    pub date: String,
    pub raw_value: String,
}

impl RawObservation {
    pub fn new(series_id: impl Into<String>, date: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            date: date.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// A parsed observation value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservationValue {
    Float(f64),
    Integer(i64),
}

impl ObservationValue {
    pub fn as_f64(self) -> f64 {
        match self {
            ObservationValue::Float(v) => v,
            ObservationValue::Integer(v) => v as f64,
        }
    }

    /// Integer view; floats are truncated toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            ObservationValue::Float(v) => v.trunc() as i64,
            ObservationValue::Integer(v) => v,
        }
    }
}

/// A [`RawObservation`] with its value parsed and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanObservation {
    pub series_id: String,
    pub date: String,
    pub value: ObservationValue,
}

/// How a raw string should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Yields and indicator levels; 6 decimal places.
    Rate,
    /// Dirty prices; 6 decimal places.
    Price,
    /// Annual coupon rates in percent; 2 decimal places.
    Coupon,
    /// Days to maturity; grouping separators allowed, truncated to an integer.
    DayCount,
}

/// One data facet of an instrument family.
///
/// The source publishes each facet of the same tenor under a different series id,
/// so every facet has its own catalog table and its own ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Yield,
    DayCount,
    Coupon,
    Price,
}

impl Facet {
    pub fn numeric_kind(self) -> NumericKind {
        match self {
            Facet::Yield => NumericKind::Rate,
            Facet::DayCount => NumericKind::DayCount,
            Facet::Coupon => NumericKind::Coupon,
            Facet::Price => NumericKind::Price,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Yield => "yield",
            Facet::DayCount => "day-count",
            Facet::Coupon => "coupon",
            Facet::Price => "price",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument families, in curve order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentFamily {
    /// Zero-coupon bills quoted by yield.
    Discount,
    /// Fixed-coupon bonds quoted by dirty price.
    Coupon,
}

impl InstrumentFamily {
    /// Families in the order they are concatenated on the curve.
    pub const ALL: [InstrumentFamily; 2] = [InstrumentFamily::Discount, InstrumentFamily::Coupon];

    /// Facets the family needs, primary (label-bearing) facet first.
    pub fn facets(self) -> &'static [Facet] {
        match self {
            InstrumentFamily::Discount => &[Facet::Yield, Facet::DayCount],
            InstrumentFamily::Coupon => &[Facet::Price, Facet::DayCount, Facet::Coupon],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentFamily::Discount => "discount",
            InstrumentFamily::Coupon => "coupon",
        }
    }
}

impl fmt::Display for InstrumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a tenor label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenorUnit {
    Days,
    Years,
}

/// A parsed tenor label such as `28D` or `2Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenor {
    pub count: u32,
    pub unit: TenorUnit,
}

/// A single assembled curve point.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurvePoint {
    pub label: String,
    pub date: String,
    pub yield_: f64,
    pub days_to_maturity: i64,
    pub price: f64,
}

/// The assembled curve as parallel, maturity-ordered sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveOutput {
    pub labels: Vec<String>,
    pub dates: Vec<String>,
    pub yields: Vec<f64>,
    pub days_to_maturity: Vec<i64>,
    pub prices: Vec<f64>,
}

impl CurveOutput {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn push(&mut self, point: YieldCurvePoint) {
        self.labels.push(point.label);
        self.dates.push(point.date);
        self.yields.push(point.yield_);
        self.days_to_maturity.push(point.days_to_maturity);
        self.prices.push(point.price);
    }

    /// Iterate the curve back as points.
    pub fn points(&self) -> impl Iterator<Item = YieldCurvePoint> + '_ {
        (0..self.len()).map(move |i| YieldCurvePoint {
            label: self.labels[i].clone(),
            date: self.dates[i].clone(),
            yield_: self.yields[i],
            days_to_maturity: self.days_to_maturity[i],
            price: self.prices[i],
        })
    }
}

/// How an indicator's reported observations are turned into a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// Use the single reported observation as-is.
    #[default]
    Immediate,
    /// Monthly year-over-year statistic; the latest point in the window wins.
    YearOverYear,
}

/// A point-in-time macro indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetric {
    pub name: String,
    pub value: f64,
    /// Reported date, or a `"<Month> <Year-1> - <Month> <Year>"` window for
    /// year-over-year indicators.
    pub date: String,
}

/// Everything handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// `DD/MM/YYYY`.
    pub anchor_date: String,
    pub curve: CurveOutput,
    pub summary: BTreeMap<String, SummaryMetric>,
}
