//! Error types for the landtally pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV loading and column lookup errors
//! - [`DealError`] - per-deal derivation errors (size, countries, coordinates)
//! - [`ReportError`] - report writing errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Loading Errors
// =============================================================================

/// Errors during CSV loading.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to detect encoding.
    #[error("Failed to detect encoding: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    ParseError(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// A column referenced by the pipeline is not in the file.
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

// =============================================================================
// Deal Derivation Errors
// =============================================================================

/// Errors while deriving attributes for a single deal.
///
/// Every variant carries the deal id so a failing run names the
/// offending input row.
#[derive(Debug, Error)]
pub enum DealError {
    /// None of the candidate size columns holds a value.
    #[error("Deal {deal_id}: no size candidate column has a value")]
    NoSizeCandidate { deal_id: String },

    /// No target-country column holds a value.
    #[error("Deal {deal_id}: no target country found")]
    MissingTargetCountry { deal_id: String },

    /// More than one distinct target country across the indexed columns.
    #[error("Deal {deal_id}: ambiguous target country ({countries:?})")]
    AmbiguousTargetCountry {
        deal_id: String,
        countries: Vec<String>,
    },

    /// Coordinate text is neither decimal nor degree-minute-second form.
    #[error("Deal {deal_id}, location {slot}: cannot parse {axis} '{value}'")]
    BadCoordinate {
        deal_id: String,
        slot: usize,
        axis: &'static str,
        value: String,
    },

    /// Latitude present but longitude absent.
    #[error("Deal {deal_id}, location {slot}: latitude without longitude")]
    MissingLongitude { deal_id: String, slot: usize },
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors while writing the report output.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write output file.
    #[error("Failed to write report: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Report JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::run`].
/// It wraps all lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Deal derivation error.
    #[error("Deal error: {0}")]
    Deal(#[from] DealError),

    /// Report writing error.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// The deals file has no rows after the status filter.
    #[error("No deals left after status filter")]
    EmptyInput,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for deal derivation.
pub type DealResult<T> = Result<T, DealError>;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // DealError -> PipelineError
        let deal_err = DealError::NoSizeCandidate {
            deal_id: "4207".into(),
        };
        let pipeline_err: PipelineError = deal_err.into();
        assert!(pipeline_err.to_string().contains("4207"));
    }

    #[test]
    fn test_bad_coordinate_format() {
        let err = DealError::BadCoordinate {
            deal_id: "11".into(),
            slot: 3,
            axis: "latitude",
            value: "not-a-coord".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("location 3"));
        assert!(msg.contains("latitude"));
        assert!(msg.contains("not-a-coord"));
    }
}
