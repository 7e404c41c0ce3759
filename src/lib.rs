//! # Landtally - land-deal CSV cleanup, geocoding and importer reports
//!
//! Landtally ingests three semicolon-delimited land-deal exports (deals,
//! investors, involvements), cleans the coded categorical fields, resolves
//! an authoritative deal size, geocodes the per-deal location records and
//! aggregates everything by importer country.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV Files  │────▶│   Parser    │────▶│  Transform  │────▶│   Report    │
//! │ (auto-enc)  │     │  (tables)   │     │ (clean+geo) │     │ (JSON+cons) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use landtally::{load_inputs, run, PipelineOptions};
//!
//! fn main() {
//!     let inputs = load_inputs("deals.csv", "investors.csv", "involvements.csv").unwrap();
//!     let summary = run(&inputs, &PipelineOptions::default()).unwrap();
//!     println!("{} importer countries", summary.index.importers.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Deal, Location, RawValue)
//! - [`parser`] - CSV loading with encoding auto-detection
//! - [`transform`] - Normalization, size resolution, geocoding, aggregation
//! - [`report`] - Console summaries and the JSON importer report
//! - [`logs`] - Console progress logging

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Reporting
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, DealError, PipelineError, ReportError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Deal, Location, NegotiationStatus, RawValue};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_encoding, load_inputs, load_table, parse_table, Inputs, Table,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::aggregate::{aggregate, ImporterIndex};
pub use transform::geocode::{dms_to_decimal, parse_coordinate};
pub use transform::normalize::{is_agriculture, normalize_deals};
pub use transform::size::{resolve_size, MissingSizePolicy};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{run, PipelineOptions, PipelineSummary};

// =============================================================================
// Re-exports - Report
// =============================================================================

pub use report::{stacked_counts, value_counts, write_importers_json};
