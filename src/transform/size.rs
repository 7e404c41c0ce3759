//! Deal-size resolution.
//!
//! The export carries several size attributes of varying reliability;
//! the authoritative size of a deal is the maximum over every candidate
//! column that holds a value.

use crate::error::{DealError, PipelineResult};
use crate::models::RawValue;
use crate::parser::Table;

/// Candidate size columns, in priority order.
pub const SIZE_COLUMNS: [&str; 6] = [
    "Deal size",
    "Current size under contract",
    "Current size in operation (production)",
    "Intended size (in ha)",
    "Size under contract (leased or purchased area, in ha)",
    "Size in operation (production, in ha)",
];

/// What to do with a deal where no size candidate holds a value.
///
/// The export does not document this case, so the caller chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSizePolicy {
    /// Fail the run.
    #[default]
    Fail,
    /// Treat the deal as size zero.
    Zero,
}

/// Resolve the size of one deal row.
///
/// Candidates go through [`RawValue`], so `code#`-prefixed numbers count
/// and non-numeric text is skipped. With no present candidate the policy
/// decides between [`DealError::NoSizeCandidate`] and `0.0`.
pub fn resolve_size(
    table: &Table,
    row: usize,
    deal_id: &str,
    policy: MissingSizePolicy,
) -> PipelineResult<f64> {
    let mut best: Option<f64> = None;
    for column in SIZE_COLUMNS {
        if let Some(value) = RawValue::parse(table.cell(row, column)?).as_number() {
            best = Some(best.map_or(value, |b: f64| b.max(value)));
        }
    }

    match (best, policy) {
        (Some(size), _) => Ok(size),
        (None, MissingSizePolicy::Zero) => Ok(0.0),
        (None, MissingSizePolicy::Fail) => Err(DealError::NoSizeCandidate {
            deal_id: deal_id.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::parser::parse_table;

    const HEADER: &str = "Deal size;Current size under contract;\
Current size in operation (production);Intended size (in ha);\
Size under contract (leased or purchased area, in ha);\
Size in operation (production, in ha)";

    fn table(row: &str) -> Table {
        parse_table(&format!("{HEADER}\n{row}\n")).unwrap()
    }

    #[test]
    fn test_maximum_of_present_candidates() {
        let t = table("100;250;50;;;");
        let size = resolve_size(&t, 0, "1", MissingSizePolicy::Fail).unwrap();
        assert_eq!(size, 250.0);
    }

    #[test]
    fn test_coded_prefix_stripped() {
        let t = table("#100;;;;;");
        let size = resolve_size(&t, 0, "1", MissingSizePolicy::Fail).unwrap();
        assert_eq!(size, 100.0);
    }

    #[test]
    fn test_single_candidate() {
        let t = table(";;;3#1200.5;;");
        let size = resolve_size(&t, 0, "1", MissingSizePolicy::Fail).unwrap();
        assert_eq!(size, 1200.5);
    }

    #[test]
    fn test_non_numeric_text_skipped() {
        let t = table("unknown;300;;;;");
        let size = resolve_size(&t, 0, "1", MissingSizePolicy::Fail).unwrap();
        assert_eq!(size, 300.0);
    }

    #[test]
    fn test_no_candidates_fails() {
        let t = table(";;;;;");
        let err = resolve_size(&t, 0, "77", MissingSizePolicy::Fail).unwrap_err();
        match err {
            PipelineError::Deal(DealError::NoSizeCandidate { deal_id }) => {
                assert_eq!(deal_id, "77");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_candidates_zero_policy() {
        let t = table(";;;;;");
        let size = resolve_size(&t, 0, "77", MissingSizePolicy::Zero).unwrap();
        assert_eq!(size, 0.0);
    }
}
