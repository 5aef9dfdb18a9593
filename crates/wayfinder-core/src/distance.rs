//! Great-circle distance between coordinates.

use wayfinder_types::Coordinate;

/// Mean Earth radius used for distance calculations, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometres.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    // Rounding can push antipodal points just past 1.0
    let c = 2.0 * a.min(1.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Format a distance in kilometres with two decimal places.
pub fn format_km(km: f64) -> String {
    format!("{:.2}", km)
}

/// Distance from `current` to `target` as a decimal string in kilometres.
///
/// # Examples
///
/// ```
/// use wayfinder_core::distance::distance_between;
/// use wayfinder_types::Coordinate;
///
/// let origin = Coordinate { latitude: 0.0, longitude: 0.0 };
/// let east = Coordinate { latitude: 0.0, longitude: 1.0 };
/// assert_eq!(distance_between(origin, east), "111.19");
/// ```
pub fn distance_between(current: Coordinate, target: Coordinate) -> String {
    format_km(haversine_km(current, target))
}
