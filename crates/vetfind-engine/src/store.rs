//! Canonical dataset plus the currently displayed view.
//!
//! The store is the only mutation surface: loading replaces the canonical
//! dataset wholesale, and every filter or sort replaces the current sequence
//! with a freshly computed one derived from it. Nothing here is shared across
//! threads; `&mut self` makes the last call to complete the one that wins.

use chrono::NaiveTime;
use vetfind_core::ClinicRecord;

use crate::error::EngineError;
use crate::hours::{filter_open_at, OpenNowPolicy};
use crate::normalize::{normalize_all, DroppedRecord};
use crate::query::{filter, filter_by_service};
use crate::ranking::{rank, SortContext, SortCriterion};
use crate::types::RawDocument;

/// Lifecycle of a [`ResultStore`]. Filters, sorts and resets stay in `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Empty,
    Loaded,
}

/// What a [`ResultStore::load`] call kept and what it dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub loaded: usize,
    pub dropped: Vec<DroppedRecord>,
}

impl LoadSummary {
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

#[derive(Debug, Clone)]
pub struct ResultStore {
    state: StoreState,
    canonical: Vec<ClinicRecord>,
    current: Vec<ClinicRecord>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: StoreState::Empty,
            canonical: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Normalizes `raws` and installs them as the canonical dataset.
    ///
    /// Malformed documents and non-document entries are dropped and
    /// reported in the summary rather than failing the load. The current
    /// sequence is reset to the full canonical sequence.
    pub fn load<I, D>(&mut self, raws: I) -> LoadSummary
    where
        I: IntoIterator<Item = D>,
        D: Into<RawDocument>,
    {
        let report = normalize_all(raws);
        let summary = LoadSummary {
            loaded: report.records.len(),
            dropped: report.dropped,
        };
        self.canonical = report.records;
        self.current = self.canonical.clone();
        self.state = StoreState::Loaded;
        tracing::info!(
            loaded = summary.loaded,
            dropped = summary.dropped_count(),
            "loaded clinic dataset"
        );
        summary
    }

    /// Restores the current sequence to the full canonical sequence.
    pub fn reset(&mut self) {
        self.current = self.canonical.clone();
        tracing::debug!(count = self.current.len(), "reset current sequence");
    }

    /// Narrows the current sequence with a free-text query.
    pub fn apply_filter(&mut self, query: &str) {
        let next = filter(&self.current, query);
        tracing::debug!(
            query,
            before = self.current.len(),
            after = next.len(),
            "applied text filter"
        );
        self.current = next;
    }

    /// Narrows the current sequence to clinics offering `tag`.
    pub fn apply_service_filter(&mut self, tag: &str) {
        let next = filter_by_service(&self.current, tag);
        tracing::debug!(
            tag,
            before = self.current.len(),
            after = next.len(),
            "applied service filter"
        );
        self.current = next;
    }

    /// Narrows the current sequence to clinics `policy` reports open at `at`.
    pub fn apply_open_filter<P>(&mut self, policy: &P, at: NaiveTime)
    where
        P: OpenNowPolicy + ?Sized,
    {
        let next = filter_open_at(&self.current, policy, at);
        tracing::debug!(
            at = %at,
            before = self.current.len(),
            after = next.len(),
            "applied open-now filter"
        );
        self.current = next;
    }

    /// Reorders the current sequence.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingReferenceLocation`] for a distance sort
    /// without a reference location. The current sequence is left unchanged.
    pub fn apply_sort(
        &mut self,
        criterion: SortCriterion,
        ctx: &SortContext,
    ) -> Result<(), EngineError> {
        let next = rank(&self.current, criterion, ctx)?;
        tracing::debug!(criterion = %criterion, count = next.len(), "applied sort");
        self.current = next;
        Ok(())
    }

    /// Read-only view of what should be displayed.
    #[must_use]
    pub fn current(&self) -> &[ClinicRecord] {
        &self.current
    }

    /// The full dataset as last loaded.
    #[must_use]
    pub fn canonical(&self) -> &[ClinicRecord] {
        &self.canonical
    }

    #[must_use]
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// `true` when the current sequence has nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vetfind_core::Location;

    use super::*;
    use crate::hours::SameDayWindow;
    use crate::types::RawClinic;

    fn raws() -> Vec<RawClinic> {
        serde_json::from_value(json!([
            {"_id": "a", "name": "Alpha Vet", "rating": {"$numberInt": "3"},
             "services_offered": ["health"],
             "location": {"coordinates": [{"$numberDouble": "0.5"}, {"$numberDouble": "0.0"}]}},
            {"_id": "b", "name": "Bravo Clinic", "rating": {"$numberDouble": "5.0"},
             "services_offered": ["grooming"],
             "location": {"coordinates": [{"$numberDouble": "2.0"}, {"$numberDouble": "0.0"}]},
             "opening_time": "09:00", "closing_time": "17:00"},
            {"_id": "c", "name": "Charlie Vet", "rating": {"$numberInt": "5"},
             "services_offered": ["health", "dental"]},
            {"name": "no id"}
        ]))
        .unwrap()
    }

    fn ids(records: &[ClinicRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn new_store_is_empty() {
        let store = ResultStore::new();
        assert_eq!(store.state(), StoreState::Empty);
        assert!(store.is_empty());
        assert!(store.canonical().is_empty());
    }

    #[test]
    fn load_normalizes_and_reports_drops() {
        let mut store = ResultStore::new();
        let summary = store.load(raws());
        assert_eq!(store.state(), StoreState::Loaded);
        assert_eq!(summary.loaded, 3);
        assert_eq!(summary.dropped_count(), 1);
        assert_eq!(ids(store.current()), vec!["a", "b", "c"]);
        assert_eq!(store.current(), store.canonical());
    }

    #[test]
    fn operations_on_empty_store_yield_empty() {
        let mut store = ResultStore::new();
        store.apply_filter("vet");
        store
            .apply_sort(SortCriterion::Rating, &SortContext::default())
            .unwrap();
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.state(), StoreState::Empty);
    }

    #[test]
    fn filter_then_sort_composes() {
        let mut store = ResultStore::new();
        store.load(raws());
        store.apply_filter("vet");
        store
            .apply_sort(SortCriterion::Rating, &SortContext::default())
            .unwrap();
        assert_eq!(ids(store.current()), vec!["c", "a"]);
    }

    #[test]
    fn reset_restores_canonical_order() {
        let mut store = ResultStore::new();
        store.load(raws());
        store
            .apply_sort(SortCriterion::Rating, &SortContext::default())
            .unwrap();
        store.apply_filter("clinic");
        store.reset();
        assert_eq!(ids(store.current()), vec!["a", "b", "c"]);
    }

    #[test]
    fn failed_distance_sort_leaves_current_unchanged() {
        let mut store = ResultStore::new();
        store.load(raws());
        store.apply_filter("vet");
        let before = store.current().to_vec();
        let err = store
            .apply_sort(SortCriterion::Distance, &SortContext::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingReferenceLocation));
        assert_eq!(store.current(), before.as_slice());
    }

    #[test]
    fn distance_sort_uses_reference() {
        let mut store = ResultStore::new();
        store.load(raws());
        let ctx = SortContext::with_reference(Location::new(0.0, 2.1));
        store.apply_sort(SortCriterion::Distance, &ctx).unwrap();
        assert_eq!(ids(store.current()), vec!["b", "a", "c"]);
    }

    #[test]
    fn service_and_open_filters_narrow_current() {
        let mut store = ResultStore::new();
        store.load(raws());
        store.apply_service_filter("HEALTH");
        assert_eq!(ids(store.current()), vec!["a", "c"]);

        store.reset();
        store.apply_open_filter(&SameDayWindow, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(ids(store.current()), vec!["b"]);
    }

    #[test]
    fn reload_replaces_canonical_dataset() {
        let mut store = ResultStore::new();
        store.load(raws());
        store.apply_filter("alpha");
        let replacement: Vec<RawClinic> =
            serde_json::from_value(json!([{"_id": "z", "name": "Zulu"}])).unwrap();
        let summary = store.load(replacement);
        assert_eq!(summary.loaded, 1);
        assert_eq!(ids(store.canonical()), vec!["z"]);
        assert_eq!(ids(store.current()), vec!["z"]);
    }
}
