//! Raw clinic document shapes as delivered by the data API.
//!
//! ## Observed shape (MongoDB Data API, `Accept: application/ejson`)
//!
//! ### Identifiers
//! `_id` is an Extended-JSON object id, `{"$oid": "64f0..."}`. Hand-edited
//! exports sometimes carry a plain string instead. Both are accepted.
//!
//! ### Numbers
//! Canonical Extended JSON wraps every number in a typed object whose value is
//! a string: `{"$numberDouble": "4.5"}` or `{"$numberInt": "4"}`. Large
//! integers use `{"$numberLong": "4"}`. Relaxed exports emit bare numbers.
//! [`ExtendedNumber`] decodes all of these; non-finite doubles (`"NaN"`,
//! `"Infinity"`) decode to `None`.
//!
//! ### Coordinates
//! `location` is a GeoJSON point: `{"type": "Point", "coordinates": [lon, lat]}`.
//! Index 0 is **longitude** and index 1 is **latitude**.
//!
//! ### Optional fields
//! `rating`, `services_offered`, `location`, `address`, `opening_time` and
//! `closing_time` may be absent, `null` or of an unexpected type. Every one of
//! them is wrapped so that a bad value degrades to "absent" instead of failing
//! the whole document.

use serde::Deserialize;

use crate::error::EngineError;

/// A value that either decoded as `T` or was kept as raw JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(serde_json::Value),
}

impl<T> Lenient<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Invalid(_) => None,
        }
    }
}

/// A scalar inside an Extended-JSON number wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericScalar {
    Number(f64),
    Text(String),
}

impl NumericScalar {
    fn to_finite_f64(&self) -> Option<f64> {
        match self {
            NumericScalar::Number(n) => n.is_finite().then_some(*n),
            NumericScalar::Text(s) => parse_finite(s),
        }
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Typed Extended-JSON number wrapper. Any subset of the tags may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NumberWrapper {
    #[serde(rename = "$numberDouble", default)]
    pub double: Option<NumericScalar>,
    #[serde(rename = "$numberInt", default)]
    pub int: Option<NumericScalar>,
    #[serde(rename = "$numberLong", default)]
    pub long: Option<NumericScalar>,
}

/// A number in any of the encodings the data API produces.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExtendedNumber {
    Plain(f64),
    Text(String),
    Wrapped(NumberWrapper),
}

impl ExtendedNumber {
    /// Plain finite value of this number.
    ///
    /// For wrapped numbers the double tag wins over the integer tags when
    /// more than one is present.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            ExtendedNumber::Plain(n) => n.is_finite().then_some(*n),
            ExtendedNumber::Text(s) => parse_finite(s),
            ExtendedNumber::Wrapped(w) => w
                .double
                .as_ref()
                .and_then(NumericScalar::to_finite_f64)
                .or_else(|| w.int.as_ref().and_then(NumericScalar::to_finite_f64))
                .or_else(|| w.long.as_ref().and_then(NumericScalar::to_finite_f64)),
        }
    }
}

/// Document identifier: an object id wrapper, a string, or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Text(String),
    Number(i64),
}

impl RawId {
    /// The identifier as a string, or `None` when it is blank.
    #[must_use]
    pub fn to_id_string(&self) -> Option<String> {
        let id = match self {
            RawId::ObjectId { oid } => oid.trim().to_string(),
            RawId::Text(s) => s.trim().to_string(),
            RawId::Number(n) => n.to_string(),
        };
        (!id.is_empty()).then_some(id)
    }
}

/// GeoJSON point; `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeoPoint {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<Lenient<ExtendedNumber>>,
}

impl RawGeoPoint {
    /// Returns `(longitude, latitude)` when both decode to finite numbers.
    #[must_use]
    pub fn lon_lat(&self) -> Option<(f64, f64)> {
        let decode = |idx: usize| {
            self.coordinates
                .get(idx)
                .and_then(Lenient::valid)
                .and_then(ExtendedNumber::value)
        };
        Some((decode(0)?, decode(1)?))
    }
}

/// A clinic document exactly as the data API returns it.
///
/// Hand-edited exports sometimes use `id` and camelCase keys next to the
/// canonical ones. Each spelling has its own field so a document carrying
/// both still decodes; the canonical key wins when both are usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawClinic {
    #[serde(rename = "_id", default)]
    pub id: Option<Lenient<RawId>>,

    #[serde(rename = "id", default)]
    pub legacy_id: Option<Lenient<RawId>>,

    #[serde(default)]
    pub name: Option<Lenient<String>>,

    #[serde(default)]
    pub rating: Option<Lenient<ExtendedNumber>>,

    /// Array of service tags, e.g. `["health", "dental", "grooming"]`.
    #[serde(default)]
    pub services_offered: Option<Lenient<Vec<Lenient<String>>>>,

    #[serde(rename = "servicesOffered", default)]
    pub services_offered_camel: Option<Lenient<Vec<Lenient<String>>>>,

    #[serde(default)]
    pub location: Option<Lenient<RawGeoPoint>>,

    #[serde(default)]
    pub address: Option<Lenient<String>>,

    /// `"HH:MM"` local opening time. Not populated by the current dataset.
    #[serde(default)]
    pub opening_time: Option<Lenient<String>>,

    #[serde(rename = "openingTime", default)]
    pub opening_time_camel: Option<Lenient<String>>,

    /// `"HH:MM"` local closing time. Not populated by the current dataset.
    #[serde(default)]
    pub closing_time: Option<Lenient<String>>,

    #[serde(rename = "closingTime", default)]
    pub closing_time_camel: Option<Lenient<String>>,
}

impl RawClinic {
    /// The document identifier: `_id` when usable, otherwise `id`.
    #[must_use]
    pub fn id_string(&self) -> Option<String> {
        let decode = |field: Option<&Lenient<RawId>>| {
            field.and_then(Lenient::valid).and_then(RawId::to_id_string)
        };
        decode(self.id.as_ref()).or_else(|| decode(self.legacy_id.as_ref()))
    }

    /// Non-blank service tags in source order. Non-string entries are skipped.
    #[must_use]
    pub fn service_tags(&self) -> Vec<String> {
        self.services_offered
            .as_ref()
            .and_then(Lenient::valid)
            .or_else(|| self.services_offered_camel.as_ref().and_then(Lenient::valid))
            .map(|tags| {
                tags.iter()
                    .filter_map(Lenient::valid)
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn opening_time(&self) -> Option<&Lenient<String>> {
        prefer_valid(self.opening_time.as_ref(), self.opening_time_camel.as_ref())
    }

    #[must_use]
    pub fn closing_time(&self) -> Option<&Lenient<String>> {
        prefer_valid(self.closing_time.as_ref(), self.closing_time_camel.as_ref())
    }
}

fn prefer_valid<'a, T>(
    primary: Option<&'a Lenient<T>>,
    fallback: Option<&'a Lenient<T>>,
) -> Option<&'a Lenient<T>> {
    match primary {
        Some(Lenient::Valid(_)) => primary,
        _ => fallback.or(primary),
    }
}

/// One entry of a record export: a clinic document, or whatever JSON value
/// stood in its place.
pub type RawDocument = Lenient<RawClinic>;

impl From<RawClinic> for RawDocument {
    fn from(raw: RawClinic) -> Self {
        Lenient::Valid(raw)
    }
}

/// Top-level record export: either the data-API envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordSet {
    Envelope { documents: Vec<RawDocument> },
    List(Vec<RawDocument>),
}

/// Parse a record export into raw documents, one per array entry.
///
/// Accepts `{"documents": [...]}` as returned by the data API's `find`
/// action, or a bare JSON array. Entries that are not clinic documents
/// (`null`, numbers, strings) are kept as [`Lenient::Invalid`] in their
/// position, so the load can report them instead of failing the file.
///
/// # Errors
///
/// Returns [`EngineError::Decode`] if the text is not valid JSON or is
/// neither shape.
pub fn parse_record_set(json: &str) -> Result<Vec<RawDocument>, EngineError> {
    let set: RecordSet = serde_json::from_str(json)?;
    Ok(match set {
        RecordSet::Envelope { documents } | RecordSet::List(documents) => documents,
    })
}
