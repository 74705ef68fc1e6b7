//! Dashboard pipeline shared by the `curve` command and tests.
//!
//! Banxico fetch -> curve assembly (anchor date first) -> summary fetch over the
//! anchor's lookback window -> summary parsing -> `Dashboard`.
//!
//! Fetching lives in [`run_dashboard`]; everything after the fetch is the pure
//! [`build_dashboard`], so the whole transformation can be exercised offline.

use std::path::Path;

use tracing::info;

use crate::curve::{AssembledCurve, CurveAssembler, CurveInput};
use crate::data::banxico::BanxicoClient;
use crate::domain::{Catalogs, CurveConfig, Dashboard, RawObservation};
use crate::error::{AppError, CurveError};
use crate::indicators::parse_summary;
use crate::models::NewtonBisection;

/// Fetch everything from Banxico and build the dashboard.
pub fn run_dashboard(config: &CurveConfig) -> Result<Dashboard, AppError> {
    let catalogs = load_catalogs(config.catalog.as_deref())?;
    let client = BanxicoClient::from_env()?;

    let input = client.fetch_curve(&catalogs, config.date)?;
    if input.is_empty() {
        let when = config
            .date
            .map(|d| format!("on {d}"))
            .unwrap_or_else(|| "at all".to_string());
        return Err(AppError::new(3, format!("Banxico returned no curve data {when}.")));
    }

    let assembled = assemble(&input, &catalogs)?;
    info!(anchor = %assembled.anchor.display(), points = assembled.curve.len(), "curve assembled");

    let summary = client.fetch_summary(&catalogs.summary, assembled.anchor, config.date)?;
    Ok(build_dashboard(assembled, &summary, &catalogs)?)
}

/// Assemble a curve with the default yield solver.
pub fn assemble(input: &CurveInput, catalogs: &Catalogs) -> Result<AssembledCurve, CurveError> {
    CurveAssembler::new(catalogs, NewtonBisection::default()).assemble(input)
}

/// Combine an assembled curve with raw summary observations.
pub fn build_dashboard(
    assembled: AssembledCurve,
    summary: &[RawObservation],
    catalogs: &Catalogs,
) -> Result<Dashboard, CurveError> {
    let summary = parse_summary(summary, &catalogs.summary)?;
    Ok(Dashboard {
        anchor_date: assembled.anchor.display(),
        curve: assembled.curve,
        summary,
    })
}

/// The bundled catalog, or the TOML file at `path`.
pub fn load_catalogs(path: Option<&Path>) -> Result<Catalogs, AppError> {
    let Some(path) = path else {
        return Ok(Catalogs::builtin()?);
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read catalog '{}': {e}", path.display())))?;
    Ok(Catalogs::from_toml_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::FamilyObservations;
    use crate::domain::Facet;

    const DATE: &str = "27/10/2025";

    fn raw(id: &str, value: &str) -> RawObservation {
        RawObservation::new(id, DATE, value)
    }

    fn input() -> CurveInput {
        CurveInput {
            discount: FamilyObservations::new()
                .with_facet(Facet::Yield, vec![raw("SF45471", "7.31"), raw("SF45470", "7.40")])
                .with_facet(Facet::DayCount, vec![raw("SF45474", "24"), raw("SF45475", "87")]),
            coupon: FamilyObservations::new()
                .with_facet(Facet::Price, vec![raw("SF45448", "99.812345")])
                .with_facet(Facet::DayCount, vec![raw("SF45452", "1,001")])
                .with_facet(Facet::Coupon, vec![raw("SF45456", "8.00")]),
        }
    }

    fn catalogs() -> Catalogs {
        Catalogs::from_toml_str(
            r#"
            [families.discount]
            name = "CETES"
            [families.discount.yield]
            SF45470 = "28D"
            SF45471 = "91D"
            [families.discount.day_count]
            SF45474 = "28D"
            SF45475 = "91D"
            [families.coupon]
            name = "MBONOS"
            [families.coupon.price]
            SF45448 = "3Y"
            [families.coupon.day_count]
            SF45452 = "3Y"
            [families.coupon.coupon]
            SF45456 = "3Y"
            [summary]
            SF43783 = { name = "TIIE28" }
            SP30578 = { name = "Inflation", kind = "year_over_year" }
            "#,
        )
        .unwrap()
    }

    #[test]
    fn builds_dashboard_offline() {
        let catalogs = catalogs();
        let assembled = assemble(&input(), &catalogs).unwrap();
        let summary = vec![
            raw("SF43783", "7.7523"),
            RawObservation::new("SP30578", "01/09/2025", "3.76"),
            RawObservation::new("SP30578", "01/10/2025", "3.63"),
        ];

        let dashboard = build_dashboard(assembled, &summary, &catalogs).unwrap();
        assert_eq!(dashboard.anchor_date, DATE);
        assert_eq!(dashboard.curve.labels, vec!["28D CETES", "91D CETES", "3Y MBONOS"]);
        assert_eq!(dashboard.curve.days_to_maturity, vec![24, 87, 1001]);
        assert_eq!(dashboard.summary["TIIE28"].value, 7.7523);
        assert_eq!(dashboard.summary["Inflation"].date, "October 2024 - October 2025");
    }

    #[test]
    fn missing_catalog_file_is_a_config_error() {
        let err = load_catalogs(Some(Path::new("/nonexistent/catalog.toml"))).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
