//! Banxico SIE REST API integration.
//!
//! Series are requested in batches (comma-joined ids) either for their latest
//! published value (`/datos/oportuno`) or over a date range
//! (`/datos/{start}/{end}`). Values come back as strings and are left raw;
//! normalization happens in the curve core.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::curve::anchor::{AnchorDate, LookbackWindow, parse_source_date};
use crate::curve::assemble::{CurveInput, FamilyObservations};
use crate::domain::{Catalogs, IndicatorKind, InstrumentFamily, RawObservation, SummaryCatalog};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://www.banxico.org.mx/SieAPIRest/service/v1/series";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Which observations to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Most recent published value of each series.
    Latest,
    /// Every value in `[start, end]`.
    Range(NaiveDate, NaiveDate),
}

impl Span {
    /// Latest value, or the single day `date` when given.
    pub fn on(date: Option<NaiveDate>) -> Self {
        match date {
            Some(d) => Span::Range(d, d),
            None => Span::Latest,
        }
    }
}

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanxicoConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl BanxicoConfig {
    /// Reads `BANXICO_API_KEY`, `BANXICO_API_URL` and `BANXICO_TIMEOUT_SECS`
    /// (after loading `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("BANXICO_API_KEY")
            .map_err(|_| AppError::new(2, "Missing BANXICO_API_KEY in environment (.env)."))?;
        let base_url = std::env::var("BANXICO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match std::env::var("BANXICO_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::new(2, format!("BANXICO_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'."))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub struct BanxicoClient {
    client: Client,
    config: BanxicoConfig,
}

impl BanxicoClient {
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(BanxicoConfig::from_env()?)
    }

    pub fn new(config: BanxicoConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Every curve facet of both families, first datum per series.
    pub fn fetch_curve(&self, catalogs: &Catalogs, date: Option<NaiveDate>) -> Result<CurveInput, AppError> {
        let span = Span::on(date);
        let mut input = CurveInput::default();

        for family in InstrumentFamily::ALL {
            let catalog = catalogs.family(family);
            let mut observations = FamilyObservations::new();
            for &facet in family.facets() {
                let ids = catalog.series_ids(facet);
                let series = self.fetch_series(&ids, span)?;
                debug!(family = %family, facet = %facet, series = series.len(), "facet fetched");
                observations.insert(facet, first_observations(&series));
            }
            match family {
                InstrumentFamily::Discount => input.discount = observations,
                InstrumentFamily::Coupon => input.coupon = observations,
            }
        }

        Ok(input)
    }

    /// Summary indicators for `anchor`.
    ///
    /// Immediate indicators are fetched on the anchor date when `date` was
    /// requested explicitly, otherwise at their latest value. Year-over-year
    /// indicators are fetched over the anchor's lookback window.
    pub fn fetch_summary(
        &self,
        catalog: &SummaryCatalog,
        anchor: AnchorDate,
        date: Option<NaiveDate>,
    ) -> Result<Vec<RawObservation>, AppError> {
        let immediate = self.fetch_series(&catalog.series_ids(IndicatorKind::Immediate), Span::on(date))?;
        let mut out = first_observations(&immediate);

        let window = anchor.lookback_window();
        let windowed = self.fetch_series(
            &catalog.series_ids(IndicatorKind::YearOverYear),
            Span::Range(window.start, window.end),
        )?;
        out.extend(windowed_observations(&windowed, window));

        info!(observations = out.len(), "summary fetched");
        Ok(out)
    }

    fn fetch_series(&self, ids: &[&str], span: Span) -> Result<Vec<SeriesData>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = series_url(&self.config.base_url, ids, span);
        debug!(%url, "requesting series");

        let resp = self
            .client
            .get(&url)
            .header("Bmx-Token", &self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| AppError::new(4, format!("Banxico request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Banxico request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read Banxico response: {e}")))?;
        parse_series_body(&body)
    }
}

/// `{base}/{ids}/datos/oportuno` or `{base}/{ids}/datos/{start}/{end}`.
pub fn series_url(base: &str, ids: &[&str], span: Span) -> String {
    let base = base.trim_end_matches('/');
    let ids = ids.join(",");
    match span {
        Span::Latest => format!("{base}/{ids}/datos/oportuno"),
        Span::Range(start, end) => format!(
            "{base}/{ids}/datos/{}/{}",
            AnchorDate::new(start).sortable(),
            AnchorDate::new(end).sortable()
        ),
    }
}

/// One series as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesData {
    #[serde(rename = "idSerie")]
    pub id: String,
    /// Absent when the series has nothing in the requested span.
    #[serde(rename = "datos", default)]
    pub data: Vec<Datum>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Datum {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "dato")]
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    bmx: Bmx,
}

#[derive(Debug, Deserialize)]
struct Bmx {
    series: Vec<SeriesData>,
}

/// Parse a `{"bmx": {"series": [...]}}` response body.
pub fn parse_series_body(body: &str) -> Result<Vec<SeriesData>, AppError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| AppError::new(4, format!("Failed to parse Banxico response: {e}")))?;
    Ok(envelope.bmx.series)
}

/// First datum of each series; series without data are skipped.
pub fn first_observations(series: &[SeriesData]) -> Vec<RawObservation> {
    series
        .iter()
        .filter_map(|s| s.data.first().map(|d| RawObservation::new(&s.id, &d.date, &d.value)))
        .collect()
}

/// Every datum inside `window`, in response order.
///
/// Data whose date does not parse are kept so the summary parser reports them.
pub fn windowed_observations(series: &[SeriesData], window: LookbackWindow) -> Vec<RawObservation> {
    series
        .iter()
        .flat_map(|s| {
            s.data
                .iter()
                .filter(|d| parse_source_date(&s.id, &d.date).map_or(true, |date| window.contains(date)))
                .map(|d| RawObservation::new(&s.id, &d.date, &d.value))
        })
        .collect()
}
