//! Curve assembly.
//!
//! Steps, all-or-nothing:
//!
//! 1. normalize every facet with its own numeric kind
//! 2. resolve the anchor date across all facets of all families
//! 3. order each facet by tenor through its own catalog table, then check that
//!    the facets of a family line up tenor by tenor
//! 4. derive the missing quantity (bill price from yield, bond yield from price)
//! 5. concatenate families in curve order (discount, then coupon)

use std::collections::BTreeMap;

use tracing::debug;

use crate::curve::anchor::{AnchorDate, resolve_anchor};
use crate::curve::tenor::{apply_rank, maturity_rank};
use crate::domain::{
    Catalogs, CleanObservation, CurveOutput, Facet, FamilyCatalog, InstrumentFamily, RawObservation, YieldCurvePoint,
};
use crate::error::CurveError;
use crate::io::ingest::normalize_all;
use crate::models::{YieldSolver, discount_price};

/// Raw facets of one instrument family, in whatever order the source sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyObservations {
    facets: BTreeMap<Facet, Vec<RawObservation>>,
}

impl FamilyObservations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facet(mut self, facet: Facet, observations: Vec<RawObservation>) -> Self {
        self.facets.insert(facet, observations);
        self
    }

    pub fn insert(&mut self, facet: Facet, observations: Vec<RawObservation>) {
        self.facets.insert(facet, observations);
    }

    pub fn facet(&self, facet: Facet) -> &[RawObservation] {
        self.facets.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.facets.values().all(Vec::is_empty)
    }
}

/// Everything needed to build one curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveInput {
    pub discount: FamilyObservations,
    pub coupon: FamilyObservations,
}

impl CurveInput {
    pub fn family(&self, family: InstrumentFamily) -> &FamilyObservations {
        match family {
            InstrumentFamily::Discount => &self.discount,
            InstrumentFamily::Coupon => &self.coupon,
        }
    }

    /// No observation in any facet of any family.
    pub fn is_empty(&self) -> bool {
        self.discount.is_empty() && self.coupon.is_empty()
    }
}

/// An assembled curve and the date it is valid for.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledCurve {
    pub anchor: AnchorDate,
    pub curve: CurveOutput,
}

/// Builds curves from raw facets using a catalog and a yield solver.
#[derive(Debug, Clone)]
pub struct CurveAssembler<'a, S> {
    catalogs: &'a Catalogs,
    solver: S,
}

impl<'a, S: YieldSolver> CurveAssembler<'a, S> {
    pub fn new(catalogs: &'a Catalogs, solver: S) -> Self {
        Self { catalogs, solver }
    }

    pub fn assemble(&self, input: &CurveInput) -> Result<AssembledCurve, CurveError> {
        let mut cleaned: BTreeMap<InstrumentFamily, BTreeMap<Facet, Vec<CleanObservation>>> = BTreeMap::new();
        for family in InstrumentFamily::ALL {
            let raw = input.family(family);
            let mut facets = BTreeMap::new();
            for &facet in family.facets() {
                facets.insert(facet, normalize_all(raw.facet(facet), facet.numeric_kind())?);
            }
            cleaned.insert(family, facets);
        }

        let anchor = resolve_anchor(cleaned.values().flat_map(|facets| facets.values().flatten()))?;
        debug!(anchor = %anchor.display(), "curve anchor resolved");

        let mut curve = CurveOutput::default();
        for (family, facets) in &cleaned {
            let catalog = self.catalogs.family(*family);
            let ordered = order_family(catalog, facets)?;
            let points = match family {
                InstrumentFamily::Discount => discount_points(catalog, &ordered),
                InstrumentFamily::Coupon => self.coupon_points(catalog, &ordered)?,
            };
            debug!(family = %family, points = points.len(), "family assembled");
            for point in points {
                curve.push(point);
            }
        }

        Ok(AssembledCurve { anchor, curve })
    }

    fn coupon_points(&self, catalog: &FamilyCatalog, ordered: &OrderedFamily) -> Result<Vec<YieldCurvePoint>, CurveError> {
        let prices = ordered.facet(Facet::Price);
        let dtms = ordered.facet(Facet::DayCount);
        let coupons = ordered.facet(Facet::Coupon);

        let mut out = Vec::with_capacity(ordered.labels.len());
        for (i, label) in ordered.labels.iter().enumerate() {
            let price = prices[i].value.as_f64();
            let dtm = dtms[i].value.as_i64();
            let yield_ = self.solver.solve_yield(price, dtm, coupons[i].value.as_f64())?;
            out.push(YieldCurvePoint {
                label: point_label(label, catalog),
                date: prices[i].date.clone(),
                yield_,
                days_to_maturity: dtm,
                price,
            });
        }
        Ok(out)
    }
}

/// A family's facets after per-facet reordering, plus the shared tenor labels.
#[derive(Debug)]
struct OrderedFamily {
    labels: Vec<String>,
    facets: BTreeMap<Facet, Vec<CleanObservation>>,
}

impl OrderedFamily {
    fn facet(&self, facet: Facet) -> &[CleanObservation] {
        self.facets.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn order_family(
    catalog: &FamilyCatalog,
    facets: &BTreeMap<Facet, Vec<CleanObservation>>,
) -> Result<OrderedFamily, CurveError> {
    let family = catalog.family();
    let mut labels: Option<Vec<String>> = None;
    let mut ordered = BTreeMap::new();

    for &facet in family.facets() {
        let table = catalog.facet(facet)?;
        let observations = facets.get(&facet).map(Vec::as_slice).unwrap_or(&[]);
        let rank = maturity_rank(observations, table)?;
        let reordered = apply_rank(observations, &rank);

        let facet_labels = reordered
            .iter()
            .map(|obs| table.tenor_label(&obs.series_id).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;

        match &labels {
            None => labels = Some(facet_labels),
            Some(expected) if *expected != facet_labels => {
                return Err(CurveError::FacetMismatch { family, facet });
            }
            Some(_) => {}
        }
        ordered.insert(facet, reordered);
    }

    Ok(OrderedFamily {
        labels: labels.unwrap_or_default(),
        facets: ordered,
    })
}

fn discount_points(catalog: &FamilyCatalog, ordered: &OrderedFamily) -> Vec<YieldCurvePoint> {
    let yields = ordered.facet(Facet::Yield);
    let dtms = ordered.facet(Facet::DayCount);

    ordered
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let yield_ = yields[i].value.as_f64();
            let dtm = dtms[i].value.as_i64();
            YieldCurvePoint {
                label: point_label(label, catalog),
                date: yields[i].date.clone(),
                yield_,
                days_to_maturity: dtm,
                price: discount_price(yield_, dtm),
            }
        })
        .collect()
}

fn point_label(tenor: &str, catalog: &FamilyCatalog) -> String {
    format!("{tenor} {}", catalog.name())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::models::{NewtonBisection, coupon_bond_price};

    const DATE: &str = "20/10/2025";

    fn raw(id: &str, value: &str) -> RawObservation {
        RawObservation::new(id, DATE, value)
    }

    fn bonds() -> FamilyObservations {
        FamilyObservations::new()
            .with_facet(
                Facet::Price,
                vec![raw("SF45450", "101.250000"), raw("SF45448", "99.500000")],
            )
            .with_facet(Facet::DayCount, vec![raw("SF45452", "1,000.00"), raw("SF45454", "3,400.00")])
            .with_facet(Facet::Coupon, vec![raw("SF45458", "8.500000"), raw("SF45456", "8.000000")])
    }

    fn two_tenor_catalogs() -> Catalogs {
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
            SF45450 = "10Y"
            [families.coupon.day_count]
            SF45452 = "3Y"
            SF45454 = "10Y"
            [families.coupon.coupon]
            SF45456 = "3Y"
            SF45458 = "10Y"
            "#,
        )
        .unwrap()
    }

    fn bills() -> FamilyObservations {
        FamilyObservations::new()
            .with_facet(Facet::Yield, vec![raw("SF45471", "7.310613"), raw("SF45470", "7.399977")])
            .with_facet(Facet::DayCount, vec![raw("SF45474", "27"), raw("SF45475", "90")])
    }

    #[test]
    fn families_concatenate_in_curve_order() {
        let catalogs = two_tenor_catalogs();
        let assembler = CurveAssembler::new(&catalogs, NewtonBisection::default());
        let input = CurveInput {
            discount: bills(),
            coupon: bonds(),
        };

        let out = assembler.assemble(&input).unwrap();
        assert_eq!(out.anchor.display(), DATE);
        assert_eq!(out.curve.labels, vec!["28D CETES", "91D CETES", "3Y MBONOS", "10Y MBONOS"]);
        assert_eq!(out.curve.days_to_maturity, vec![27, 90, 1000, 3400]);
        assert_eq!(out.curve.dates, vec![DATE; 4]);
        assert_eq!(&out.curve.yields[..2], &[7.399977, 7.310613]);
        assert_relative_eq!(out.curve.prices[0], discount_price(7.399977, 27));
        assert_eq!(&out.curve.prices[2..], &[99.5, 101.25]);

        // Coupon yields reprice to the quoted prices.
        assert_relative_eq!(coupon_bond_price(out.curve.yields[2], 1000, 8.0), 99.5, epsilon = 1e-6);
        assert_relative_eq!(coupon_bond_price(out.curve.yields[3], 3400, 8.5), 101.25, epsilon = 1e-6);
    }

    #[test]
    fn out_of_order_bills_come_out_by_tenor() {
        let catalogs = Catalogs::builtin().unwrap();
        let assembler = CurveAssembler::new(&catalogs, NewtonBisection::default());
        // 182D, 28D, 364D, 91D as delivered.
        let discount = FamilyObservations::new()
            .with_facet(
                Facet::Yield,
                vec![
                    raw("SF45472", "7.41"),
                    raw("SF45470", "7.40"),
                    raw("SF45473", "7.50"),
                    raw("SF45471", "7.31"),
                ],
            )
            .with_facet(
                Facet::DayCount,
                vec![
                    raw("SF45477", "364"),
                    raw("SF45475", "91"),
                    raw("SF45474", "28"),
                    raw("SF45476", "182"),
                ],
            );
        let input = CurveInput {
            discount,
            coupon: FamilyObservations::new(),
        };

        let out = assembler.assemble(&input).unwrap().curve;
        assert_eq!(out.labels, vec!["28D CETES", "91D CETES", "182D CETES", "364D CETES"]);
        assert_eq!(out.yields, vec![7.40, 7.31, 7.41, 7.50]);
        assert_eq!(out.days_to_maturity, vec![28, 91, 182, 364]);
    }

    #[test]
    fn mismatched_dates_commit_nothing() {
        let catalogs = two_tenor_catalogs();
        let assembler = CurveAssembler::new(&catalogs, NewtonBisection::default());
        let mut coupon = bonds();
        coupon.insert(
            Facet::Coupon,
            vec![
                RawObservation::new("SF45458", "17/10/2025", "8.5"),
                raw("SF45456", "8.0"),
            ],
        );
        let input = CurveInput {
            discount: bills(),
            coupon,
        };

        assert_eq!(
            assembler.assemble(&input).unwrap_err(),
            CurveError::InconsistentCurveDates {
                dates: vec!["17/10/2025".to_string(), DATE.to_string()],
            }
        );
    }

    #[test]
    fn missing_tenor_in_one_facet_is_a_mismatch() {
        let catalogs = two_tenor_catalogs();
        let assembler = CurveAssembler::new(&catalogs, NewtonBisection::default());
        let discount = bills().with_facet(Facet::DayCount, vec![raw("SF45474", "27")]);
        let input = CurveInput {
            discount,
            coupon: bonds(),
        };

        assert_eq!(
            assembler.assemble(&input).unwrap_err(),
            CurveError::FacetMismatch {
                family: InstrumentFamily::Discount,
                facet: Facet::DayCount,
            }
        );
    }

    #[test]
    fn series_from_another_facet_is_unmapped() {
        let catalogs = two_tenor_catalogs();
        let assembler = CurveAssembler::new(&catalogs, NewtonBisection::default());
        // A day-count id delivered in the yield facet.
        let discount = bills().with_facet(Facet::Yield, vec![raw("SF45474", "7.1"), raw("SF45471", "7.3")]);
        let input = CurveInput {
            discount,
            coupon: bonds(),
        };

        assert!(matches!(
            assembler.assemble(&input).unwrap_err(),
            CurveError::MissingSeriesMapping { series_id, .. } if series_id == "SF45474"
        ));
    }

    #[test]
    fn bond_day_counts_follow_their_own_ranking() {
        let catalogs = two_tenor_catalogs();
        let assembler = CurveAssembler::new(&catalogs, NewtonBisection::default());
        let coupon = FamilyObservations::new()
            .with_facet(Facet::Price, vec![raw("SF45448", "99.500000"), raw("SF45450", "101.250000")])
            .with_facet(Facet::DayCount, vec![raw("SF45454", "3,400.00"), raw("SF45452", "1,000.00")])
            .with_facet(Facet::Coupon, vec![raw("SF45456", "8.000000"), raw("SF45458", "8.500000")]);
        let input = CurveInput {
            discount: bills(),
            coupon,
        };

        let out = assembler.assemble(&input).unwrap();
        assert_eq!(out.curve.days_to_maturity, vec![27, 90, 1000, 3400]);
        assert_eq!(&out.curve.prices[2..], &[99.5, 101.25]);
        assert_relative_eq!(coupon_bond_price(out.curve.yields[2], 1000, 8.0), 99.5, epsilon = 1e-6);
        assert_relative_eq!(coupon_bond_price(out.curve.yields[3], 3400, 8.5), 101.25, epsilon = 1e-6);
    }

    #[test]
    fn unsolvable_bond_price_fails_the_curve() {
        let catalogs = two_tenor_catalogs();
        let assembler = CurveAssembler::new(&catalogs, NewtonBisection::default());
        let coupon = bonds().with_facet(
            Facet::Price,
            vec![raw("SF45450", "-4.0"), raw("SF45448", "99.5")],
        );
        let input = CurveInput {
            discount: bills(),
            coupon,
        };

        assert!(matches!(
            assembler.assemble(&input).unwrap_err(),
            CurveError::YieldSolverDidNotConverge { dtm: 3400, .. }
        ));
    }
}
