//! In-memory search, filter and ranking engine for clinic records.
//!
//! Raw documents enter through [`ResultStore::load`], which normalizes them
//! into the canonical dataset. Text, service and open-now filters and the
//! rating/distance sorts each derive a new current sequence from the previous
//! one; [`ResultStore::reset`] goes back to the canonical dataset.

pub mod error;
pub mod geo;
pub mod hours;
pub mod normalize;
pub mod query;
pub mod ranking;
pub mod store;
pub mod types;

pub use error::EngineError;
pub use geo::{distance_between, distance_km, EARTH_RADIUS_KM};
pub use hours::{filter_open_at, OpenNowPolicy, SameDayWindow};
pub use normalize::{normalize_all, normalize_clinic, DroppedRecord, NormalizeReport};
pub use query::{filter, filter_by_service};
pub use ranking::{
    distance_from, rank, sort_by_distance, sort_by_rating, SortContext, SortCriterion,
};
pub use store::{LoadSummary, ResultStore, StoreState};
pub use types::{parse_record_set, Lenient, RawClinic, RawDocument};
