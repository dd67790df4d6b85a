//! Normalization from raw clinic documents to [`vetfind_core::ClinicRecord`].
//!
//! Decoding of the loose wire shapes lives in [`crate::types`]; this module
//! applies defaults, range checks and the identity rules.

use std::collections::HashMap;

use vetfind_core::{ClinicRecord, DailyHours, Location, MAX_RATING, UNRATED};

use crate::error::EngineError;
use crate::types::{ExtendedNumber, Lenient, RawClinic, RawDocument};

/// A document that did not make it into the canonical dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    /// Zero-based position in the input sequence.
    pub position: usize,
    /// Identifier, when the document had one.
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of normalizing a whole record set.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub records: Vec<ClinicRecord>,
    pub dropped: Vec<DroppedRecord>,
}

/// Normalizes a raw [`RawClinic`] into a [`ClinicRecord`].
///
/// Missing or unusable rating, coordinates, services, address and hours fall
/// back to their defaults. `position` is only used for error reporting.
///
/// # Errors
///
/// Returns [`EngineError::MalformedRecord`] if `_id` or `name` is absent or
/// blank.
pub fn normalize_clinic(position: usize, raw: &RawClinic) -> Result<ClinicRecord, EngineError> {
    let id = raw.id_string().ok_or_else(|| EngineError::MalformedRecord {
            position,
            reason: "missing _id".into(),
        })?;

    let name = non_blank(raw.name.as_ref()).ok_or_else(|| EngineError::MalformedRecord {
        position,
        reason: format!("record {id} has no name"),
    })?;

    let rating = normalize_rating(
        &id,
        raw.rating
            .as_ref()
            .and_then(Lenient::valid)
            .and_then(ExtendedNumber::value),
    );

    let coordinates = raw
        .location
        .as_ref()
        .and_then(Lenient::valid)
        .and_then(|point| point.lon_lat())
        .map(|(lon, lat)| normalize_location(&id, Location::new(lat, lon)));

    let hours = match (
        non_blank(raw.opening_time()),
        non_blank(raw.closing_time()),
    ) {
        (Some(opens), Some(closes)) => {
            let parsed = DailyHours::parse(&opens, &closes);
            if parsed.is_none() {
                tracing::debug!(
                    id = %id,
                    opens = %opens,
                    closes = %closes,
                    "ignoring unparseable opening hours"
                );
            }
            parsed
        }
        _ => None,
    };

    Ok(ClinicRecord {
        services_offered: raw.service_tags(),
        address: non_blank(raw.address.as_ref()),
        id,
        name,
        rating,
        coordinates,
        hours,
    })
}

/// Normalizes every document, dropping the malformed ones.
///
/// Entries that are not clinic documents at all (`null`, numbers, strings)
/// are dropped with their position like any other malformed record.
/// Identifiers must be unique in the canonical dataset: the first document
/// with a given id wins and later duplicates are dropped. Input order is
/// preserved for the survivors.
#[must_use]
pub fn normalize_all<I, D>(raws: I) -> NormalizeReport
where
    I: IntoIterator<Item = D>,
    D: Into<RawDocument>,
{
    let mut report = NormalizeReport::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (position, document) in raws.into_iter().enumerate() {
        let raw = match document.into() {
            Lenient::Valid(raw) => raw,
            Lenient::Invalid(value) => {
                let reason = not_a_document_reason(&value);
                tracing::warn!(position, reason = %reason, "dropping malformed clinic record");
                report.dropped.push(DroppedRecord {
                    position,
                    id: None,
                    reason,
                });
                continue;
            }
        };
        let raw_id = raw.id_string();

        match normalize_clinic(position, &raw) {
            Ok(record) => {
                if let Some(&first) = first_seen.get(&record.id) {
                    tracing::warn!(position, id = %record.id, "dropping duplicate clinic record");
                    report.dropped.push(DroppedRecord {
                        position,
                        id: Some(record.id),
                        reason: format!("duplicate id (first seen at position {first})"),
                    });
                    continue;
                }
                first_seen.insert(record.id.clone(), position);
                report.records.push(record);
            }
            Err(err) => {
                let reason = match err {
                    EngineError::MalformedRecord { reason, .. } => reason,
                    other => other.to_string(),
                };
                tracing::warn!(position, reason = %reason, "dropping malformed clinic record");
                report.dropped.push(DroppedRecord {
                    position,
                    id: raw_id,
                    reason,
                });
            }
        }
    }

    tracing::debug!(
        loaded = report.records.len(),
        dropped = report.dropped.len(),
        "normalized clinic record set"
    );
    report
}

fn not_a_document_reason(value: &serde_json::Value) -> String {
    let kind = match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an undecodable object",
    };
    format!("entry is {kind}, not a clinic document")
}

fn non_blank(value: Option<&Lenient<String>>) -> Option<String> {
    value
        .and_then(Lenient::valid)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Clamp a decoded rating into `[0, MAX_RATING]`; absent becomes [`UNRATED`].
fn normalize_rating(id: &str, rating: Option<f64>) -> f64 {
    let Some(rating) = rating else {
        return UNRATED;
    };
    if (0.0..=MAX_RATING).contains(&rating) {
        // Adding zero folds -0.0 into 0.0.
        return rating + 0.0;
    }
    tracing::warn!(id, rating, "rating outside [0, {MAX_RATING}]; clamping");
    rating.clamp(0.0, MAX_RATING)
}

fn normalize_location(id: &str, location: Location) -> Location {
    if location.is_in_range() {
        return location;
    }
    let clamped = location.clamped();
    tracing::warn!(
        id,
        latitude = location.latitude,
        longitude = location.longitude,
        "coordinates outside valid range; clamping"
    );
    clamped
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
