//! Free-text and service-tag filtering.
//!
//! Every function here is pure: the input slice is never touched and the
//! survivors are cloned into a new sequence in their original relative order.

use vetfind_core::ClinicRecord;

/// Keeps records whose name, or any whole service tag, contains `query`
/// case-insensitively.
///
/// The query is trimmed before matching. A blank query matches everything and
/// returns the input unchanged.
#[must_use]
pub fn filter(records: &[ClinicRecord], query: &str) -> Vec<ClinicRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| matches_query(record, &needle))
        .cloned()
        .collect()
}

/// Returns `true` when `needle` (already lower-cased) occurs in the record's
/// name or inside at least one of its service tags.
#[must_use]
pub fn matches_query(record: &ClinicRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record
            .services_offered
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Keeps records offering exactly the service `tag`, ignoring case and
/// surrounding whitespace. A blank tag returns the input unchanged.
#[must_use]
pub fn filter_by_service(records: &[ClinicRecord], tag: &str) -> Vec<ClinicRecord> {
    let wanted = tag.trim().to_lowercase();
    if wanted.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| {
            record
                .services_offered
                .iter()
                .any(|offered| offered.trim().to_lowercase() == wanted)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clinics() -> Vec<ClinicRecord> {
        vec![
            ClinicRecord::new("1", "Kitsilano Animal Hospital").with_services(["health", "Dental"]),
            ClinicRecord::new("2", "Main Street Vet").with_services(["grooming"]),
            ClinicRecord::new("3", "Paws & Claws").with_services(["Veterinary Care", "boarding"]),
            ClinicRecord::new("4", "Cat Clinic"),
        ]
    }

    fn ids(records: &[ClinicRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let all = clinics();
        assert_eq!(filter(&all, ""), all);
        assert_eq!(filter(&all, "   "), all);
    }

    #[test]
    fn matches_name_case_insensitively() {
        let all = clinics();
        assert_eq!(ids(&filter(&all, "HOSPITAL")), vec!["1"]);
        assert_eq!(filter(&all, "VET"), filter(&all, "vet"));
    }

    #[test]
    fn matches_substring_of_whole_service_tag() {
        let all = clinics();
        // "vet" hits the name of #2 and the "Veterinary Care" tag of #3.
        assert_eq!(ids(&filter(&all, "vet")), vec!["2", "3"]);
        assert_eq!(ids(&filter(&all, "dent")), vec!["1"]);
        assert_eq!(ids(&filter(&all, "care")), vec!["3"]);
    }

    #[test]
    fn single_characters_of_tags_do_not_match_longer_queries() {
        let all = vec![ClinicRecord::new("x", "Zed").with_services(["ab"])];
        // Every character of "ba" appears in the tag, but the tag does not contain "ba".
        assert!(filter(&all, "ba").is_empty());
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let all = clinics();
        assert_eq!(ids(&filter(&all, "  cat ")), vec!["4"]);
    }

    #[test]
    fn unmatched_query_is_empty_not_error() {
        assert!(filter(&clinics(), "aquarium").is_empty());
    }

    #[test]
    fn filter_preserves_relative_order() {
        let all = clinics();
        let result = filter(&all, "a");
        let positions: Vec<usize> = result
            .iter()
            .map(|r| all.iter().position(|c| c.id == r.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn filter_does_not_mutate_input() {
        let all = clinics();
        let before = all.clone();
        let _ = filter(&all, "vet");
        assert_eq!(all, before);
    }

    #[test]
    fn service_filter_requires_whole_tag_equality() {
        let all = clinics();
        assert_eq!(ids(&filter_by_service(&all, "HEALTH")), vec!["1"]);
        assert!(filter_by_service(&all, "heal").is_empty());
        assert_eq!(ids(&filter_by_service(&all, " veterinary care ")), vec!["3"]);
    }

    #[test]
    fn blank_service_tag_is_identity() {
        let all = clinics();
        assert_eq!(filter_by_service(&all, " "), all);
    }
}
