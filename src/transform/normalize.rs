//! Categorical cleanup and status filtering.
//!
//! Coded exports prefix categorical values with `code#`; the payload after
//! the last `#` is the usable label. Normalization rewrites the standardized
//! columns in a new table and drops every row whose negotiation status is
//! not one of the allowed stages.

use crate::error::CsvResult;
use crate::models::{strip_code, NegotiationStatus};
use crate::parser::Table;

/// Columns whose coded prefixes are stripped during normalization.
pub const STANDARDIZE_COLUMNS: [&str; 2] = ["Negotiation status", "Intention of investment"];

/// Agriculture-related investment intention categories.
pub const AGRICULTURE_INTENTS: [&str; 5] = [
    "Food crops",
    "Livestock",
    "Agriculture unspecified",
    "Non-food agricultural commodities",
    "Biofuels",
];

/// True if a normalized intention names any agriculture category.
pub fn is_agriculture(intention: &str) -> bool {
    AGRICULTURE_INTENTS.iter().any(|i| intention.contains(i))
}

/// Strip coded prefixes from the standardized columns and keep only rows
/// whose negotiation status is an allowed stage.
///
/// Returns a new table; the input is untouched.
pub fn normalize_deals(table: &Table) -> CsvResult<Table> {
    let status_idx = table.column_index("Negotiation status")?;
    let standardize: Vec<usize> = STANDARDIZE_COLUMNS
        .iter()
        .map(|c| table.column_index(c))
        .collect::<CsvResult<_>>()?;

    let width = table.headers().len();
    let mut rows = Vec::new();

    for row in 0..table.len() {
        let mut values: Vec<String> = table.row(row).to_vec();
        values.resize(width, String::new());

        for &idx in &standardize {
            let stripped = strip_code(values[idx].trim()).trim().to_string();
            values[idx] = stripped;
        }

        if NegotiationStatus::from_label(&values[status_idx]).is_some() {
            rows.push(values);
        }
    }

    Ok(Table::new(table.headers().to_vec(), rows))
}
