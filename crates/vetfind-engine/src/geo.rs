//! Great-circle distance on a spherical Earth.

use vetfind_core::Location;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
///
/// Never fails and never returns a negative value. Out-of-range inputs are
/// brought back onto the globe with [`Location::clamped`]; non-finite inputs
/// yield `f64::INFINITY` so such points rank after every real distance.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance_between(&Location::new(lat1, lon1), &Location::new(lat2, lon2))
}

/// [`distance_km`] over two [`Location`]s.
#[must_use]
pub fn distance_between(a: &Location, b: &Location) -> f64 {
    let (Some(a), Some(b)) = (sanitize(*a), sanitize(*b)) else {
        return f64::INFINITY;
    };

    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    // Absolute deltas keep the result bit-for-bit symmetric in its arguments.
    let d_phi = (b.latitude - a.latitude).abs().to_radians();
    let d_lambda = (b.longitude - a.longitude).abs().to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] near antipodes.
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

fn sanitize(point: Location) -> Option<Location> {
    if !point.latitude.is_finite() || !point.longitude.is_finite() {
        tracing::debug!(
            latitude = point.latitude,
            longitude = point.longitude,
            "non-finite coordinate in distance calculation"
        );
        return None;
    }
    if point.is_in_range() {
        return Some(point);
    }
    let clamped = point.clamped();
    tracing::debug!(
        latitude = point.latitude,
        longitude = point.longitude,
        clamped_latitude = clamped.latitude,
        clamped_longitude = clamped.longitude,
        "clamping out-of-range coordinate"
    );
    Some(clamped)
}
