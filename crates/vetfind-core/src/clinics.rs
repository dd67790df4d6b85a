use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Rating assigned to clinics whose source record carries no usable rating.
pub const UNRATED: f64 = 0.0;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when latitude is within `[-90, 90]` and longitude within
    /// `[-180, 180]`.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Brings an out-of-range point back onto the globe.
    ///
    /// Latitude is clamped to the poles and longitude is wrapped into
    /// `[-180, 180)`. In-range points are returned unchanged.
    #[must_use]
    pub fn clamped(self) -> Self {
        if self.is_in_range() {
            return self;
        }
        let latitude = self.latitude.clamp(-90.0, 90.0);
        let longitude = if (-180.0..=180.0).contains(&self.longitude) {
            self.longitude
        } else {
            (self.longitude + 180.0).rem_euclid(360.0) - 180.0
        };
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Daily opening window of a clinic, as local time of day.
///
/// `closes <= opens` describes a window that runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHours {
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl DailyHours {
    /// Parses a pair of `"HH:MM"` strings. Returns `None` if either side is
    /// blank or not a valid time of day.
    #[must_use]
    pub fn parse(opens: &str, closes: &str) -> Option<Self> {
        let opens = parse_time_of_day(opens)?;
        let closes = parse_time_of_day(closes)?;
        Some(Self { opens, closes })
    }

    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        self.closes <= self.opens
    }
}

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

/// A clinic normalized from a raw source document.
///
/// Every field except `id` and `name` has a defined fallback, so a record
/// with missing rating, coordinates or services is still displayable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicRecord {
    pub id: String,
    pub name: String,
    /// In `[0, MAX_RATING]`; [`UNRATED`] when the source had no rating.
    pub rating: f64,
    /// Service tags as delivered (case preserved).
    pub services_offered: Vec<String>,
    /// `None` when the source had no usable coordinate pair.
    pub coordinates: Option<Location>,
    pub address: Option<String>,
    pub hours: Option<DailyHours>,
}

impl ClinicRecord {
    /// Builds a record with only identity fields set and every other field at
    /// its fallback value.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating: UNRATED,
            services_offered: Vec::new(),
            coordinates: None,
            address: None,
            hours: None,
        }
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services_offered = services.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Location::new(latitude, longitude));
        self
    }

    #[must_use]
    pub fn with_hours(mut self, hours: DailyHours) -> Self {
        self.hours = Some(hours);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_in_range_is_unchanged_by_clamp() {
        let loc = Location::new(49.28, -123.12);
        assert_eq!(loc.clamped(), loc);
    }

    #[test]
    fn location_clamps_latitude_to_pole() {
        let loc = Location::new(95.0, 10.0).clamped();
        assert!((loc.latitude - 90.0).abs() < f64::EPSILON);
        assert!((loc.longitude - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn location_wraps_longitude_past_antimeridian() {
        let loc = Location::new(0.0, 181.0).clamped();
        assert!((loc.longitude - (-179.0)).abs() < 1e-9, "got {}", loc.longitude);
        let loc = Location::new(0.0, -190.0).clamped();
        assert!((loc.longitude - 170.0).abs() < 1e-9, "got {}", loc.longitude);
    }

    #[test]
    fn daily_hours_parses_hh_mm() {
        let hours = DailyHours::parse("08:30", "17:00").expect("valid hours");
        assert_eq!(hours.opens, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(hours.closes, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert!(!hours.crosses_midnight());
    }

    #[test]
    fn daily_hours_rejects_garbage() {
        assert!(DailyHours::parse("8am", "17:00").is_none());
        assert!(DailyHours::parse("", "17:00").is_none());
        assert!(DailyHours::parse("25:00", "17:00").is_none());
    }

    #[test]
    fn daily_hours_overnight_window() {
        let hours = DailyHours::parse("20:00", "06:00").unwrap();
        assert!(hours.crosses_midnight());
    }

    #[test]
    fn clinic_record_defaults() {
        let record = ClinicRecord::new("abc", "Kits Vet");
        assert!((record.rating - UNRATED).abs() < f64::EPSILON);
        assert!(record.services_offered.is_empty());
        assert!(record.coordinates.is_none());
        assert!(record.hours.is_none());
    }

    #[test]
    fn clinic_record_serializes_to_json() {
        let record = ClinicRecord::new("abc", "Kits Vet")
            .with_rating(4.5)
            .with_services(["health"])
            .with_coordinates(49.27, -123.16);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Kits Vet");
        assert_eq!(value["coordinates"]["latitude"], 49.27);
        assert_eq!(value["services_offered"][0], "health");
    }
}
