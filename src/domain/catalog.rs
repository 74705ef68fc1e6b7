//! Series-id catalogs.
//!
//! Catalogs are plain, read-only values. They are loaded once (from the bundled
//! `catalog.toml` or a user-supplied file) and passed by reference to everything
//! that needs them. Each facet keeps its own table; tables are never merged.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;

use crate::curve::tenor::parse_tenor;
use crate::domain::{Facet, IndicatorKind, InstrumentFamily};
use crate::error::CurveError;

const BUILTIN_CATALOG: &str = include_str!("../../catalog.toml");

/// `series id -> tenor label` for one facet of one family.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetCatalog {
    family: InstrumentFamily,
    facet: Facet,
    entries: BTreeMap<String, String>,
}

impl FacetCatalog {
    pub fn new(family: InstrumentFamily, facet: Facet, entries: BTreeMap<String, String>) -> Self {
        Self { family, facet, entries }
    }

    pub fn family(&self) -> InstrumentFamily {
        self.family
    }

    pub fn facet(&self) -> Facet {
        self.facet
    }

    /// Tenor label for `series_id`.
    pub fn tenor_label(&self, series_id: &str) -> Result<&str, CurveError> {
        self.entries
            .get(series_id)
            .map(String::as_str)
            .ok_or_else(|| CurveError::MissingSeriesMapping {
                series_id: series_id.to_string(),
                table: self.table_name(),
            })
    }

    pub fn series_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn labels(&self) -> BTreeSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn table_name(&self) -> String {
        format!("{} {}", self.family, self.facet)
    }
}

/// All facet tables of one instrument family plus its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyCatalog {
    family: InstrumentFamily,
    name: String,
    facets: BTreeMap<Facet, FacetCatalog>,
}

impl FamilyCatalog {
    pub fn new(family: InstrumentFamily, name: impl Into<String>, facets: Vec<FacetCatalog>) -> Self {
        Self {
            family,
            name: name.into(),
            facets: facets.into_iter().map(|c| (c.facet(), c)).collect(),
        }
    }

    pub fn family(&self) -> InstrumentFamily {
        self.family
    }

    /// Suffix appended to curve labels (e.g. `CETES`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facet(&self, facet: Facet) -> Result<&FacetCatalog, CurveError> {
        self.facets.get(&facet).ok_or_else(|| {
            CurveError::InvalidCatalog(format!("{} family has no {} table", self.family, facet))
        })
    }

    /// Comma-joinable series ids of a facet, in catalog order.
    pub fn series_ids(&self, facet: Facet) -> Vec<&str> {
        self.facets
            .get(&facet)
            .map(|c| c.series_ids().collect())
            .unwrap_or_default()
    }
}

/// Catalog entry for one macro indicator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndicatorSpec {
    pub name: String,
    #[serde(default)]
    pub kind: IndicatorKind,
}

/// `series id -> indicator` for the summary panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryCatalog {
    entries: BTreeMap<String, IndicatorSpec>,
}

impl SummaryCatalog {
    pub fn new(entries: BTreeMap<String, IndicatorSpec>) -> Self {
        Self { entries }
    }

    pub fn resolve(&self, series_id: &str) -> Option<&IndicatorSpec> {
        self.entries.get(series_id)
    }

    pub fn series_ids(&self, kind: IndicatorKind) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, spec)| spec.kind == kind)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Every catalog the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogs {
    pub discount: FamilyCatalog,
    pub coupon: FamilyCatalog,
    pub summary: SummaryCatalog,
}

impl Catalogs {
    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CurveError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a TOML catalog document.
    pub fn from_toml_str(text: &str) -> Result<Self, CurveError> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| CurveError::InvalidCatalog(e.to_string()))?;

        let catalogs = Catalogs {
            discount: file.families.discount.into_catalog(InstrumentFamily::Discount),
            coupon: file.families.coupon.into_catalog(InstrumentFamily::Coupon),
            summary: SummaryCatalog::new(file.summary),
        };
        catalogs.validate()?;
        Ok(catalogs)
    }

    pub fn family(&self, family: InstrumentFamily) -> &FamilyCatalog {
        match family {
            InstrumentFamily::Discount => &self.discount,
            InstrumentFamily::Coupon => &self.coupon,
        }
    }

    /// Checks:
    /// - series ids are unique across every table
    /// - each family has a non-empty table for each of its facets
    /// - all facets of a family cover the same tenors, and every tenor parses
    fn validate(&self) -> Result<(), CurveError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for family in InstrumentFamily::ALL {
            let catalog = self.family(family);
            let primary = catalog.facet(family.facets()[0])?;
            let expected = primary.labels();

            for &facet in family.facets() {
                let table = catalog.facet(facet)?;
                if table.is_empty() {
                    return Err(CurveError::InvalidCatalog(format!(
                        "{family} {facet} table is empty"
                    )));
                }
                if table.labels() != expected {
                    return Err(CurveError::InvalidCatalog(format!(
                        "{family} {facet} table covers different tenors than {family} {}",
                        primary.facet()
                    )));
                }
                for label in table.labels() {
                    parse_tenor(label)?;
                }
                for id in table.series_ids() {
                    if !seen.insert(id) {
                        return Err(CurveError::InvalidCatalog(format!("duplicate series id {id}")));
                    }
                }
            }
        }

        for id in self.summary.entries.keys() {
            if !seen.insert(id) {
                return Err(CurveError::InvalidCatalog(format!("duplicate series id {id}")));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    families: FamiliesFile,
    #[serde(default)]
    summary: BTreeMap<String, IndicatorSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FamiliesFile {
    discount: FamilyFile,
    coupon: FamilyFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FamilyFile {
    name: String,
    #[serde(rename = "yield", default)]
    yield_: BTreeMap<String, String>,
    #[serde(default)]
    day_count: BTreeMap<String, String>,
    #[serde(default)]
    coupon: BTreeMap<String, String>,
    #[serde(default)]
    price: BTreeMap<String, String>,
}

impl FamilyFile {
    fn into_catalog(self, family: InstrumentFamily) -> FamilyCatalog {
        let tables = [
            (Facet::Yield, self.yield_),
            (Facet::DayCount, self.day_count),
            (Facet::Coupon, self.coupon),
            (Facet::Price, self.price),
        ];
        let facets = tables
            .into_iter()
            .filter(|(facet, _)| family.facets().contains(facet))
            .map(|(facet, entries)| FacetCatalog::new(family, facet, entries))
            .collect();
        FamilyCatalog::new(family, self.name, facets)
    }
}
