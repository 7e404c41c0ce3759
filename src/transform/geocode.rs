//! Coordinate parsing and per-deal location collection.
//!
//! Coordinates appear either as decimals (sometimes with a comma decimal
//! separator) or as degree-minute-second text such as `40°30'0"N`. Each
//! deal carries up to [`LOCATION_SLOTS`] indexed location sub-records;
//! the list is contiguous from slot 1 and ends at the first slot with an
//! absent latitude.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DealError, PipelineResult};
use crate::models::Location;
use crate::parser::Table;

/// Highest location slot carried by the export.
pub const LOCATION_SLOTS: usize = 21;

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit regex"));
static SOUTH_WEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"[swSW]").expect("hemisphere regex"));

/// Convert degree-minute-second text to decimal degrees.
///
/// Whitespace is ignored. The sign is negative when the text names the
/// southern or western hemisphere. Digit runs are read as degrees,
/// minutes, seconds and fractional seconds; missing parts default to
/// zero. Returns `None` when the text holds no digits at all.
pub fn dms_to_decimal(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let sign = if SOUTH_WEST.is_match(&compact) {
        -1.0
    } else {
        1.0
    };

    let runs: Vec<&str> = DIGIT_RUNS
        .find_iter(&compact)
        .map(|m| m.as_str())
        .collect();

    let degrees = runs.first()?.parse::<f64>().ok()?;
    let minutes = runs
        .get(1)
        .and_then(|r| r.parse::<f64>().ok())
        .unwrap_or(0.0);
    let mut seconds = runs
        .get(2)
        .and_then(|r| r.parse::<f64>().ok())
        .unwrap_or(0.0);
    if let Some(fraction) = runs.get(3) {
        seconds += format!("0.{fraction}").parse::<f64>().unwrap_or(0.0);
    }

    Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}

/// Parse a coordinate cell: plain decimal (comma or period separator),
/// or degree-minute-second text.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let text = raw.trim().replace(',', ".");
    if let Ok(value) = text.parse::<f64>() {
        return Some(value);
    }
    dms_to_decimal(&text)
}

/// Collect the contiguous location list for one deal row.
///
/// Scanning stops at the first slot whose latitude is absent; later slots
/// are never read. Each retained location copies the deal's agriculture
/// flag and resolved size.
pub fn collect_locations(
    table: &Table,
    row: usize,
    deal_id: &str,
    agriculture: bool,
    size: f64,
) -> PipelineResult<Vec<Location>> {
    let mut locations = Vec::new();

    for slot in 1..=LOCATION_SLOTS {
        let lat_raw = table.cell(row, &format!("Location {slot}: Latitude"))?;
        if lat_raw.trim().is_empty() {
            break;
        }
        let lat = parse_coordinate(lat_raw).ok_or_else(|| DealError::BadCoordinate {
            deal_id: deal_id.to_string(),
            slot,
            axis: "latitude",
            value: lat_raw.to_string(),
        })?;

        let lng_raw = table.cell(row, &format!("Location {slot}: Longitude"))?;
        if lng_raw.trim().is_empty() {
            return Err(DealError::MissingLongitude {
                deal_id: deal_id.to_string(),
                slot,
            }
            .into());
        }
        let lng = parse_coordinate(lng_raw).ok_or_else(|| DealError::BadCoordinate {
            deal_id: deal_id.to_string(),
            slot,
            axis: "longitude",
            value: lng_raw.to_string(),
        })?;

        let country = table.optional_cell(row, &format!("Location {slot}: Target country"))?;
        let accuracy =
            table.optional_cell(row, &format!("Location {slot}: Spatial accuracy level"))?;

        locations.push(Location {
            coords: (lat, lng),
            country,
            accuracy,
            agriculture,
            size,
        });
    }

    Ok(locations)
}
