//! Great-circle distance between two coordinates.

use crate::GeoPoint;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between `a` and `b`.
///
/// Coordinates are not validated; out-of-range input simply flows through
/// the floating point math.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Render a distance as `"<value> km"` with a fixed number of decimals.
pub fn format_distance(km: f64, decimals: usize) -> String {
    format!("{km:.decimals$} km")
}
