//! Transform stages: normalization, size resolution, geocoding,
//! aggregation, and the pipeline that wires them together.

pub mod aggregate;
pub mod geocode;
pub mod normalize;
pub mod pipeline;
pub mod size;

pub use aggregate::{aggregate, ImporterIndex};
pub use pipeline::{run, PipelineOptions, PipelineSummary};
