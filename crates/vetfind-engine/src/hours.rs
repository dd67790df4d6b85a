//! Optional "open now" filtering.
//!
//! Opening hours are not part of the current clinic dataset, so this is kept
//! behind [`OpenNowPolicy`]: callers choose how a record's schedule is
//! interpreted, and [`SameDayWindow`] is the one policy shipped here.

use chrono::NaiveTime;
use vetfind_core::ClinicRecord;

/// Decides whether a clinic is open at a local time of day.
pub trait OpenNowPolicy {
    fn is_open_at(&self, record: &ClinicRecord, at: NaiveTime) -> bool;
}

/// Treats [`vetfind_core::DailyHours`] as one window per day.
///
/// Open strictly between opening and closing time. A window whose closing
/// time is not after its opening time runs past midnight. Records without
/// hours are never open.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameDayWindow;

impl OpenNowPolicy for SameDayWindow {
    fn is_open_at(&self, record: &ClinicRecord, at: NaiveTime) -> bool {
        let Some(hours) = record.hours else {
            return false;
        };
        if hours.crosses_midnight() {
            at > hours.opens || at < hours.closes
        } else {
            hours.opens < at && at < hours.closes
        }
    }
}

/// Keeps records the policy reports open at `at`, in input order.
#[must_use]
pub fn filter_open_at<P>(records: &[ClinicRecord], policy: &P, at: NaiveTime) -> Vec<ClinicRecord>
where
    P: OpenNowPolicy + ?Sized,
{
    records
        .iter()
        .filter(|record| policy.is_open_at(record, at))
        .cloned()
        .collect()
}
