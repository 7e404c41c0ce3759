//! Country extraction and per-importer rollup.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{CsvResult, DealError, PipelineResult};
use crate::models::{Deal, Location};
use crate::parser::Table;

/// Export-country columns (countries produce is exported to).
pub const EXPORT_COUNTRY_COLUMNS: [&str; 3] = ["Country 1", "Country 2", "Country 3"];

/// Needle for discovering the target-country column family.
pub const TARGET_COUNTRY_NEEDLE: &str = "Target country";

/// The single target country of a deal row.
///
/// Collects non-empty values across every column whose name contains
/// [`TARGET_COUNTRY_NEEDLE`] (the indexed deal columns and the per-location
/// copies). Exactly one distinct value is required.
pub fn target_country(table: &Table, row: usize, deal_id: &str) -> PipelineResult<String> {
    let mut countries = BTreeSet::new();
    for column in table.columns_containing(TARGET_COUNTRY_NEEDLE) {
        if let Some(value) = table.optional_cell(row, column)? {
            countries.insert(value);
        }
    }

    let mut iter = countries.into_iter();
    match (iter.next(), iter.next()) {
        (Some(country), None) => Ok(country),
        (None, _) => Err(DealError::MissingTargetCountry {
            deal_id: deal_id.to_string(),
        }
        .into()),
        (Some(first), Some(second)) => {
            let mut all = vec![first, second];
            all.extend(iter);
            Err(DealError::AmbiguousTargetCountry {
                deal_id: deal_id.to_string(),
                countries: all,
            }
            .into())
        }
    }
}

/// Deduplicated export countries of a deal row.
///
/// A deal may export to several countries; all of them are reported.
pub fn export_countries(table: &Table, row: usize) -> CsvResult<Vec<String>> {
    let mut countries = BTreeSet::new();
    for column in EXPORT_COUNTRY_COLUMNS {
        if let Some(value) = table.optional_cell(row, column)? {
            countries.insert(value);
        }
    }
    Ok(countries.into_iter().collect())
}

// =============================================================================
// Importer Rollup
// =============================================================================

/// Aggregated per-importer view of the deal set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImporterIndex {
    /// Total deal size attributed to each importer country.
    pub totals: BTreeMap<String, f64>,
    /// Locations of agricultural deals, keyed by importer country.
    ///
    /// A country appears here only once at least one agricultural deal
    /// with a location is attributed to it.
    pub importers: BTreeMap<String, Vec<Location>>,
}

impl ImporterIndex {
    /// Importer countries ranked by total size, descending (ties by name).
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .totals
            .iter()
            .map(|(country, size)| (country.as_str(), *size))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }
}

/// Roll deals up by export country.
pub fn aggregate(deals: &[Deal]) -> ImporterIndex {
    let mut index = ImporterIndex::default();
    for deal in deals {
        for country in &deal.export_countries {
            *index.totals.entry(country.clone()).or_insert(0.0) += deal.size;
            if deal.agriculture && !deal.locations.is_empty() {
                index
                    .importers
                    .entry(country.clone())
                    .or_default()
                    .extend(deal.locations.iter().cloned());
            }
        }
    }
    index
}

/// Total deal size by target country, in country order.
pub fn area_by_target(deals: &[Deal]) -> BTreeMap<String, f64> {
    let mut areas = BTreeMap::new();
    for deal in deals {
        *areas.entry(deal.target_country.clone()).or_insert(0.0) += deal.size;
    }
    areas
}
