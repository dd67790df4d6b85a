//! Rating and distance ordering.
//!
//! Both orderings use a stable sort, so records that compare equal keep the
//! relative order they had in the input.

use std::cmp::Ordering;

use vetfind_core::{ClinicRecord, Location, UNRATED};

use crate::error::EngineError;
use crate::geo::distance_between;

/// Ordering applied to the current result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    /// Highest rating first.
    Rating,
    /// Nearest to the reference location first.
    Distance,
}

impl std::fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortCriterion::Rating => write!(f, "rating"),
            SortCriterion::Distance => write!(f, "distance"),
        }
    }
}

impl std::str::FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rating" | "ratings" => Ok(SortCriterion::Rating),
            "distance" | "nearest" => Ok(SortCriterion::Distance),
            other => Err(format!(
                "unknown sort criterion '{other}'; expected 'rating' or 'distance'"
            )),
        }
    }
}

/// Inputs a sort may need beyond the records themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SortContext {
    /// The user's resolved location, if the location grant has completed.
    pub reference: Option<Location>,
}

impl SortContext {
    #[must_use]
    pub fn with_reference(reference: Location) -> Self {
        Self {
            reference: Some(reference),
        }
    }
}

/// Descending by rating. Equal ratings keep their input order.
#[must_use]
pub fn sort_by_rating(records: &[ClinicRecord]) -> Vec<ClinicRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| rating_key(b).total_cmp(&rating_key(a)));
    sorted
}

/// Ascending by distance from `reference`.
///
/// Records without coordinates go after every located record and keep their
/// input order among themselves.
///
/// # Errors
///
/// Returns [`EngineError::MissingReferenceLocation`] when `reference` is
/// `None`. No fallback ordering is applied.
pub fn sort_by_distance(
    records: &[ClinicRecord],
    reference: Option<Location>,
) -> Result<Vec<ClinicRecord>, EngineError> {
    let reference = reference.ok_or(EngineError::MissingReferenceLocation)?;

    let mut keyed: Vec<(Option<f64>, &ClinicRecord)> = records
        .iter()
        .map(|record| (distance_from(&reference, record), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_distance(*a, *b));

    Ok(keyed.into_iter().map(|(_, record)| record.clone()).collect())
}

/// Dispatches to the sort selected by `criterion`.
///
/// # Errors
///
/// Propagates [`EngineError::MissingReferenceLocation`] from
/// [`sort_by_distance`].
pub fn rank(
    records: &[ClinicRecord],
    criterion: SortCriterion,
    ctx: &SortContext,
) -> Result<Vec<ClinicRecord>, EngineError> {
    match criterion {
        SortCriterion::Rating => Ok(sort_by_rating(records)),
        SortCriterion::Distance => sort_by_distance(records, ctx.reference),
    }
}

/// Kilometres from `reference` to the record, or `None` when the record has
/// no coordinates.
#[must_use]
pub fn distance_from(reference: &Location, record: &ClinicRecord) -> Option<f64> {
    record
        .coordinates
        .as_ref()
        .map(|coords| distance_between(reference, coords))
}

/// NaN counts as unrated and `-0.0` as `0.0`, so `total_cmp` sees one
/// consistent order.
fn rating_key(record: &ClinicRecord) -> f64 {
    if record.rating.is_nan() {
        UNRATED
    } else {
        record.rating + 0.0
    }
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
