//! Domain models for the landtally pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`RawValue`] - a CSV cell resolved into absent / numeric / text
//! - [`NegotiationStatus`] - lifecycle stage of a deal
//! - [`Deal`] - a deal row with all derived attributes
//! - [`Location`] - a geocoded location sub-record of a deal

use serde::{Deserialize, Serialize};

// =============================================================================
// Raw Cell Values
// =============================================================================

/// Strip a `code#` prefix from an exported cell value.
///
/// Coded categorical exports prefix values with a numeric code and `#`
/// (for example `10#Concluded (Contract signed)`). The payload is the
/// substring after the last `#`; values without a `#` pass through.
pub fn strip_code(raw: &str) -> &str {
    match raw.rfind('#') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    }
}

/// A CSV cell resolved once at parse time.
///
/// Exported cells are one of three things: empty, a number (possibly behind
/// a `code#` prefix), or text (possibly behind a `code#` prefix). Resolving
/// the cell into this union up front keeps the downstream stages free of
/// per-field string inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Empty cell.
    Absent,
    /// Numeric payload, prefix already stripped.
    Number(f64),
    /// Textual payload, prefix already stripped.
    Text(String),
}

impl RawValue {
    /// Resolve a raw cell.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return RawValue::Absent;
        }
        let payload = strip_code(trimmed).trim();
        if payload.is_empty() {
            return RawValue::Absent;
        }
        match payload.parse::<f64>() {
            Ok(n) => RawValue::Number(n),
            Err(_) => RawValue::Text(payload.to_string()),
        }
    }

    /// Numeric payload, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }
}

// =============================================================================
// Negotiation Status
// =============================================================================

/// Lifecycle stage of a deal.
///
/// Only deals in one of these four stages take part in the report;
/// every other status is filtered out during normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegotiationStatus {
    /// Intended, under negotiation.
    IntendedUnderNegotiation,
    /// Intended, memorandum of understanding.
    IntendedMemorandum,
    /// Concluded with an oral agreement.
    ConcludedOralAgreement,
    /// Concluded with a signed contract.
    ConcludedContractSigned,
}

impl NegotiationStatus {
    /// Parse a status from its export label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Intended (Under negotiation)" => Some(Self::IntendedUnderNegotiation),
            "Indended (Memorandum of understanding)" => Some(Self::IntendedMemorandum),
            "Concluded (Oral Agreement)" => Some(Self::ConcludedOralAgreement),
            "Concluded (Contract signed)" => Some(Self::ConcludedContractSigned),
            _ => None,
        }
    }

    /// The export label for this status.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::IntendedUnderNegotiation => "Intended (Under negotiation)",
            Self::IntendedMemorandum => "Indended (Memorandum of understanding)",
            Self::ConcludedOralAgreement => "Concluded (Oral Agreement)",
            Self::ConcludedContractSigned => "Concluded (Contract signed)",
        }
    }
}

// =============================================================================
// Location
// =============================================================================

/// A geocoded location sub-record of a deal.
///
/// This is the JSON report entry format: each agricultural deal contributes
/// its locations to the per-importer lists in the output file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Decimal degrees, latitude first.
    pub coords: (f64, f64),
    /// Target country of the location, if recorded.
    pub country: Option<String>,
    /// Spatial accuracy level, if recorded.
    pub accuracy: Option<String>,
    /// Copy of the owning deal's agriculture flag.
    pub agriculture: bool,
    /// Copy of the owning deal's resolved size.
    pub size: f64,
}

// =============================================================================
// Deal
// =============================================================================

/// A deal row with all derived attributes resolved.
#[derive(Debug, Clone)]
pub struct Deal {
    /// Unique deal identifier.
    pub id: String,
    /// Negotiation status after normalization.
    pub status: NegotiationStatus,
    /// Normalized multi-valued investment intention (comma-separated).
    pub intention: String,
    /// True if the intention matches an agriculture-related category.
    pub agriculture: bool,
    /// Resolved deal size in hectares.
    pub size: f64,
    /// The single target country of the deal.
    pub target_country: String,
    /// Countries produce is exported to (deduplicated `Country 1..3`).
    pub export_countries: Vec<String>,
    /// Geocoded locations, contiguous from slot 1.
    pub locations: Vec<Location>,
}

// =============================================================================
// Tests
// =============================================================================
