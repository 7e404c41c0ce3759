//! Console summaries and the JSON importer report.
//!
//! Everything here prints to stdout; pipeline progress lines live in
//! [`crate::logs`] and go to stderr. The section layout mirrors the
//! report this tool exists to produce: input counts, distributions of
//! the categorical columns, stacked breakdowns of the multi-valued
//! columns, ranked importer totals and per-importer drilldowns.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CsvResult, ReportResult};
use crate::models::Deal;
use crate::parser::{Inputs, Table};
use crate::transform::aggregate::{self, ImporterIndex};

/// Label used for absent cells in distributions.
pub const MISSING_LABEL: &str = "(missing)";

/// Single-valued categorical columns whose distributions are reported.
pub const COUNT_COLUMNS: [&str; 9] = [
    "Deal scope",
    "Negotiation status",
    "Operating company: Classification",
    "Presence of land conflicts",
    "Displacement of people",
    "Community consultation",
    "Community reaction",
    "Has export",
    "Has domestic use",
];

/// Multi-valued columns reported as stacked breakdowns, with their
/// separators.
pub const MULTI_VALUE_COLUMNS: [(&str, &str); 3] = [
    ("Former land use", "|"),
    ("Former land owner", "|"),
    ("Negative impacts for local communities", "|"),
];

/// Separator for the multi-valued intention column.
pub const INTENTION_SEPARATOR: &str = ", ";

/// Number of importer countries given a drilldown section.
pub const TOP_IMPORTERS: usize = 5;

// =============================================================================
// Counting
// =============================================================================

/// Count occurrences of each value, absent cells under [`MISSING_LABEL`].
///
/// Sorted by descending count, ties by value.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        let value = value.trim();
        let label = if value.is_empty() {
            MISSING_LABEL.to_string()
        } else {
            value.to_string()
        };
        *counts.entry(label).or_insert(0) += 1;
    }
    sorted(counts)
}

/// Split multi-valued cells on `separator`, stack the parts and count
/// them. Absent cells are dropped.
pub fn stacked_counts<'a>(
    values: impl IntoIterator<Item = &'a str>,
    separator: &str,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        for part in value.split(separator) {
            let part = part.trim();
            if !part.is_empty() {
                *counts.entry(part.to_string()).or_insert(0) += 1;
            }
        }
    }
    sorted(counts)
}

fn sorted(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// All values of a column, optionally restricted to a row subset.
pub fn column_values<'t>(
    table: &'t Table,
    column: &str,
    rows: Option<&[usize]>,
) -> CsvResult<Vec<&'t str>> {
    let mut out = Vec::new();
    match rows {
        Some(rows) => {
            for &row in rows {
                out.push(table.cell(row, column)?);
            }
        }
        None => {
            for row in 0..table.len() {
                out.push(table.cell(row, column)?);
            }
        }
    }
    Ok(out)
}

// =============================================================================
// Printing
// =============================================================================

pub fn separator() {
    println!("{}", "=".repeat(20));
}

fn dash_separator() {
    println!("{}", "-".repeat(20));
}

fn tilde_separator() {
    println!("{}", "~".repeat(20));
}

fn print_counts(counts: &[(String, usize)]) {
    for (label, count) in counts {
        println!("{label}  {count}");
    }
}

fn print_frequencies(counts: &[(String, usize)]) {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return;
    }
    for (label, count) in counts {
        println!("{label}  {:.6}", *count as f64 / total as f64);
    }
}

/// Row counts for the three input files.
pub fn print_input_counts(inputs: &Inputs) {
    println!("deals {}", inputs.deals.len());
    println!("investors {}", inputs.investors.len());
    println!("involvements {}", inputs.involvements.len());
}

/// One line per deals column.
pub fn print_columns(headers: &[String]) {
    for header in headers {
        println!("{header}");
    }
}

/// Size sum per target country, in country order.
pub fn print_area_by_target(deals: &[Deal]) {
    for (country, size) in aggregate::area_by_target(deals) {
        println!("{country}  {size}");
    }
}

/// Stacked and whole-value breakdowns of the intention column.
pub fn print_intention_report(table: &Table) -> CsvResult<()> {
    let values = column_values(table, "Intention of investment", None)?;
    let stacked = stacked_counts(values.iter().copied(), INTENTION_SEPARATOR);
    print_counts(&stacked);
    dash_separator();
    print_frequencies(&stacked);
    dash_separator();
    print_frequencies(&value_counts(values));
    dash_separator();
    Ok(())
}

/// Share of deals flagged as agriculture.
pub fn print_agriculture_share(deals: &[Deal]) {
    let counts = value_counts(deals.iter().map(|d| if d.agriculture { "true" } else { "false" }));
    print_frequencies(&counts);
}

/// Stacked breakdowns for the pipe-separated columns.
pub fn print_multi_value_reports(table: &Table) -> CsvResult<()> {
    for (column, sep) in MULTI_VALUE_COLUMNS {
        let values = column_values(table, column, None)?;
        print_counts(&stacked_counts(values, sep));
        separator();
    }
    Ok(())
}

/// Counts and normalized distribution of one single-valued column.
fn print_column_distribution(table: &Table, column: &str, rows: Option<&[usize]>) -> CsvResult<()> {
    let counts = value_counts(column_values(table, column, rows)?);
    println!("{column}");
    print_counts(&counts);
    dash_separator();
    print_frequencies(&counts);
    Ok(())
}

/// Distributions of the single-valued categorical columns.
pub fn print_count_columns(table: &Table, rows: Option<&[usize]>) -> CsvResult<()> {
    for column in COUNT_COLUMNS {
        print_column_distribution(table, column, rows)?;
        separator();
    }
    Ok(())
}

/// Importer totals, ranked descending.
pub fn print_ranked_totals(index: &ImporterIndex) {
    for (country, size) in index.ranked() {
        println!("{country} {size}");
    }
}

/// Per-importer drilldown for the top countries by total size.
pub fn print_top_importers(
    table: &Table,
    deals: &[Deal],
    index: &ImporterIndex,
    top: usize,
) -> CsvResult<()> {
    for (country, _) in index.ranked().into_iter().take(top) {
        let rows: Vec<usize> = deals
            .iter()
            .enumerate()
            .filter(|(_, d)| d.export_countries.iter().any(|c| c == country))
            .map(|(i, _)| i)
            .collect();
        let subset: Vec<Deal> = rows.iter().map(|&i| deals[i].clone()).collect();

        println!("\n**** {country} ****");
        println!("{} deals", rows.len());
        for column in COUNT_COLUMNS {
            print_column_distribution(table, column, Some(&rows))?;
            tilde_separator();
        }
        println!("Agriculture");
        print_agriculture_share(&subset);
        tilde_separator();
        print_area_by_target(&subset);
        separator();
    }
    Ok(())
}

// =============================================================================
// JSON output
// =============================================================================

/// Write the importer -> agricultural-location mapping as compact JSON.
pub fn write_importers_json<P: AsRef<Path>>(path: P, index: &ImporterIndex) -> ReportResult<()> {
    let file = std::fs::File::create(path.as_ref())?;
    serde_json::to_writer(file, &index.importers)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, NegotiationStatus};
    use crate::parser::parse_table;
    use std::collections::BTreeMap;

    #[test]
    fn test_value_counts_ordering_and_missing() {
        let counts = value_counts(vec!["a", "b", "a", "", "b", "a"]);
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 3),
                ("b".to_string(), 2),
                (MISSING_LABEL.to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_stacked_counts_comma() {
        let counts = stacked_counts(
            vec!["Food crops, Livestock", "Food crops", ""],
            INTENTION_SEPARATOR,
        );
        assert_eq!(
            counts,
            vec![("Food crops".to_string(), 2), ("Livestock".to_string(), 1)]
        );
    }

    #[test]
    fn test_stacked_counts_pipe() {
        let counts = stacked_counts(vec!["Forestry|Agriculture", "Forestry"], "|");
        assert_eq!(
            counts,
            vec![("Forestry".to_string(), 2), ("Agriculture".to_string(), 1)]
        );
    }

    #[test]
    fn test_frequencies_sum_to_one() {
        let counts = value_counts(vec!["x", "y", "x", "z"]);
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_column_values_subset() {
        let table = parse_table("a\n1\n2\n3\n").unwrap();
        let values = column_values(&table, "a", Some(&[0, 2])).unwrap();
        assert_eq!(values, vec!["1", "3"]);
    }

    fn agri_deal(id: &str, size: f64, exports: &[&str], locations: usize) -> Deal {
        Deal {
            id: id.to_string(),
            status: NegotiationStatus::ConcludedContractSigned,
            intention: "Food crops".to_string(),
            agriculture: true,
            size,
            target_country: "Ethiopia".to_string(),
            export_countries: exports.iter().map(|c| c.to_string()).collect(),
            locations: (0..locations)
                .map(|i| Location {
                    coords: (9.0 + i as f64, 40.0),
                    country: Some("Ethiopia".to_string()),
                    accuracy: Some("COORDINATES".to_string()),
                    agriculture: true,
                    size,
                })
                .collect(),
        }
    }

    #[test]
    fn test_importers_json_round_trip() {
        let deals = vec![
            agri_deal("1", 100.0, &["India"], 2),
            agri_deal("2", 40.0, &["India", "China"], 1),
        ];
        let index = aggregate::aggregate(&deals);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("importers.json");
        write_importers_json(&path, &index).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, Vec<Location>> = serde_json::from_str(&content).unwrap();

        // Re-aggregated per-country sums equal the aggregator's view of the
        // agriculture-flagged deals.
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for (country, locations) in &parsed {
            *sums.entry(country.as_str()).or_insert(0.0) +=
                locations.iter().map(|l| l.size).sum::<f64>();
        }
        assert_eq!(sums["India"], 2.0 * 100.0 + 40.0);
        assert_eq!(sums["China"], 40.0);
        assert_eq!(parsed["India"].len(), 3);
        assert_eq!(parsed["China"].len(), 1);
    }
}
