//! Stage orchestration for a full report run.
//!
//! The pipeline is one linear batch job: load, normalize, derive,
//! aggregate, report. Every stage takes the previous stage's output as an
//! immutable value and any failure aborts the run.

use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_success};
use crate::models::{Deal, NegotiationStatus};
use crate::parser::{Inputs, Table};
use crate::report;
use crate::transform::aggregate::{self, ImporterIndex};
use crate::transform::geocode;
use crate::transform::normalize;
use crate::transform::size::{self, MissingSizePolicy};

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Policy for deals with no present size candidate.
    pub missing_size: MissingSizePolicy,
    /// Path of the JSON importer report.
    pub output: PathBuf,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            missing_size: MissingSizePolicy::Fail,
            output: PathBuf::from("importers.json"),
        }
    }
}

/// Result of a complete pipeline run.
#[derive(Debug)]
pub struct PipelineSummary {
    /// Deals derived from the filtered table.
    pub deals: Vec<Deal>,
    /// Per-importer rollup written to the report.
    pub index: ImporterIndex,
    /// Rows in the raw deals file.
    pub deals_loaded: usize,
    /// Rows surviving the status filter.
    pub deals_kept: usize,
    /// Where the JSON report was written.
    pub output: PathBuf,
}

/// Run the full pipeline over loaded inputs.
///
/// Prints the report sections to stdout, writes the JSON importer
/// report, and returns the derived data for callers that want it.
pub fn run(inputs: &Inputs, options: &PipelineOptions) -> PipelineResult<PipelineSummary> {
    report::print_input_counts(inputs);
    report::separator();
    report::print_columns(inputs.deals.headers());
    report::separator();

    log_info("Normalizing categorical columns...");
    let deals_table = normalize::normalize_deals(&inputs.deals)?;
    log_success(format!(
        "{} of {} deals kept after status filter",
        deals_table.len(),
        inputs.deals.len()
    ));
    println!("{} deals", deals_table.len());
    report::separator();

    if deals_table.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    log_info("Deriving deal attributes...");
    let deals = derive_deals(&deals_table, options.missing_size)?;
    let agriculture = deals.iter().filter(|d| d.agriculture).count();
    log_success(format!(
        "{} deals derived ({} agriculture)",
        deals.len(),
        agriculture
    ));

    println!("Area by target country");
    report::print_area_by_target(&deals);
    report::separator();

    report::print_intention_report(&deals_table)?;
    report::print_agriculture_share(&deals);
    report::separator();

    report::print_multi_value_reports(&deals_table)?;
    report::print_count_columns(&deals_table, None)?;

    log_info("Aggregating by export country...");
    let index = aggregate::aggregate(&deals);
    report::print_ranked_totals(&index);
    report::separator();

    log_info(format!(
        "Writing importer report to {}",
        options.output.display()
    ));
    report::write_importers_json(&options.output, &index)?;
    log_success(format!("{} importer countries written", index.importers.len()));

    report::print_top_importers(&deals_table, &deals, &index, report::TOP_IMPORTERS)?;

    Ok(PipelineSummary {
        deals_loaded: inputs.deals.len(),
        deals_kept: deals_table.len(),
        output: options.output.clone(),
        deals,
        index,
    })
}

/// Derive the typed deal list from the filtered table.
fn derive_deals(table: &Table, policy: MissingSizePolicy) -> PipelineResult<Vec<Deal>> {
    let mut deals = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let id = table.cell(row, "Deal ID")?.to_string();

        let Some(status) = NegotiationStatus::from_label(table.cell(row, "Negotiation status")?)
        else {
            // normalize_deals only keeps rows with an allowed status
            continue;
        };

        let intention = table.cell(row, "Intention of investment")?.to_string();
        let agriculture = normalize::is_agriculture(&intention);
        let size = size::resolve_size(table, row, &id, policy)?;
        let target_country = aggregate::target_country(table, row, &id)?;
        let export_countries = aggregate::export_countries(table, row)?;
        let locations = geocode::collect_locations(table, row, &id, agriculture, size)?;

        deals.push(Deal {
            id,
            status,
            intention,
            agriculture,
            size,
            target_country,
            export_countries,
            locations,
        });
    }

    Ok(deals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DealError;
    use crate::parser::parse_table;

    /// Header carrying every column the pipeline touches, with two
    /// location slots.
    fn header() -> String {
        let mut columns = vec![
            "Deal ID".to_string(),
            "Negotiation status".to_string(),
            "Intention of investment".to_string(),
            "Deal scope".to_string(),
            "Operating company: Classification".to_string(),
            "Presence of land conflicts".to_string(),
            "Displacement of people".to_string(),
            "Community consultation".to_string(),
            "Community reaction".to_string(),
            "Has export".to_string(),
            "Has domestic use".to_string(),
            "Former land use".to_string(),
            "Former land owner".to_string(),
            "Negative impacts for local communities".to_string(),
            "Deal size".to_string(),
            "Current size under contract".to_string(),
            "Current size in operation (production)".to_string(),
            "Intended size (in ha)".to_string(),
            "Size under contract (leased or purchased area, in ha)".to_string(),
            "Size in operation (production, in ha)".to_string(),
            "Target country 1".to_string(),
            "Country 1".to_string(),
            "Country 2".to_string(),
            "Country 3".to_string(),
        ];
        for slot in 1..=2 {
            columns.push(format!("Location {slot}: Latitude"));
            columns.push(format!("Location {slot}: Longitude"));
            columns.push(format!("Location {slot}: Target country"));
            columns.push(format!("Location {slot}: Spatial accuracy level"));
        }
        columns.join(";")
    }

    fn inputs(deal_rows: &[&str]) -> Inputs {
        let mut csv = header();
        csv.push('\n');
        for row in deal_rows {
            csv.push_str(row);
            csv.push('\n');
        }
        Inputs {
            deals: parse_table(&csv).unwrap(),
            investors: parse_table("Investor ID;Name\n1;Acme\n").unwrap(),
            involvements: parse_table("Investor ID;Deal ID\n1;1\n").unwrap(),
        }
    }

    fn options(dir: &tempfile::TempDir) -> PipelineOptions {
        PipelineOptions {
            missing_size: MissingSizePolicy::Fail,
            output: dir.path().join("importers.json"),
        }
    }

    #[test]
    fn test_end_to_end_filter_and_size() {
        // One deal survives the status filter with size resolved from the
        // only present candidate; the other is dropped by status.
        let inputs = inputs(&[
            "1;10#Intended (Under negotiation);20#Food crops;transnational;;;;;;;;;;;#100;;;;;;Ethiopia;India;;;9,1;40,2;Ethiopia;COORDINATES;;;;",
            "2;30#Failed (Negotiations failed);20#Mining;domestic;;;;;;;;;;;#999;;;;;;Kenya;China;;;;;;;;;;",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&inputs, &options(&dir)).unwrap();

        assert_eq!(summary.deals_loaded, 2);
        assert_eq!(summary.deals_kept, 1);
        assert_eq!(summary.deals.len(), 1);

        let deal = &summary.deals[0];
        assert_eq!(deal.id, "1");
        assert_eq!(deal.status, NegotiationStatus::IntendedUnderNegotiation);
        assert_eq!(deal.size, 100.0);
        assert!(deal.agriculture);
        assert_eq!(deal.target_country, "Ethiopia");
        assert_eq!(deal.export_countries, vec!["India"]);
        assert_eq!(deal.locations.len(), 1);

        assert_eq!(summary.index.totals["India"], 100.0);
        assert!(summary.output.exists());
    }

    #[test]
    fn test_written_report_round_trips() {
        let inputs = inputs(&[
            "1;Concluded (Contract signed);Food crops;transnational;;;;;;;;;;;1500;;;;;;Ethiopia;India;China;;9.0;40.0;Ethiopia;COORDINATES;;;;",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&inputs, &options(&dir)).unwrap();

        let content = std::fs::read_to_string(&summary.output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        for country in ["India", "China"] {
            assert_eq!(parsed[country][0]["size"], 1500.0);
            assert_eq!(parsed[country][0]["coords"][0], 9.0);
            assert_eq!(parsed[country][0]["agriculture"], true);
        }
    }

    #[test]
    fn test_missing_size_candidate_fails_by_default() {
        let inputs = inputs(&[
            "1;Concluded (Contract signed);Food crops;transnational;;;;;;;;;;;;;;;;;Ethiopia;India;;;;;;;;;;",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let err = run(&inputs, &options(&dir)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Deal(DealError::NoSizeCandidate { .. })
        ));
    }

    #[test]
    fn test_missing_size_candidate_zero_policy() {
        let inputs = inputs(&[
            "1;Concluded (Contract signed);Food crops;transnational;;;;;;;;;;;;;;;;;Ethiopia;India;;;;;;;;;;",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir);
        opts.missing_size = MissingSizePolicy::Zero;
        let summary = run(&inputs, &opts).unwrap();
        assert_eq!(summary.deals[0].size, 0.0);
    }

    #[test]
    fn test_ambiguous_target_country_fails() {
        let inputs = inputs(&[
            "1;Concluded (Contract signed);Food crops;transnational;;;;;;;;;;;100;;;;;;Ethiopia;India;;;9.0;40.0;Kenya;COORDINATES;;;;",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let err = run(&inputs, &options(&dir)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Deal(DealError::AmbiguousTargetCountry { .. })
        ));
    }

    #[test]
    fn test_all_filtered_is_empty_input() {
        let inputs = inputs(&[
            "1;30#Failed (Negotiations failed);;;;;;;;;;;;;100;;;;;;Ethiopia;India;;;;;;;;;;",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let err = run(&inputs, &options(&dir)).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }
}
