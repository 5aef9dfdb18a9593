//! Location View assembly.
//!
//! Turns the cached locations, the current position and the user's range
//! and search text into the distance-sorted list shown to the user.

use serde::{Deserialize, Serialize};

use wayfinder_types::{Coordinate, Location};

use crate::distance::distance_between;

/// A location annotated with its distance from the current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedLocation {
    #[serde(flatten)]
    pub location: Location,
    /// Distance in kilometres with two decimals.
    pub distance: String,
}

impl LocatedLocation {
    /// The distance as a number.
    pub fn distance_km(&self) -> f64 {
        parse_distance(&self.distance)
    }
}

fn parse_distance(distance: &str) -> f64 {
    distance.parse().unwrap_or(f64::NAN)
}

/// Build the list of locations to show.
///
/// With no known position the result is empty. Otherwise a location is kept
/// when its distance is at most `range_km` and its locale contains `search`
/// (trimmed, case-insensitive). The result is sorted by ascending distance;
/// locations at the same distance keep their input order.
pub fn assemble_view(
    locations: &[Location],
    current: Option<Coordinate>,
    range_km: f64,
    search: &str,
) -> Vec<LocatedLocation> {
    let Some(current) = current else {
        return Vec::new();
    };

    let needle = search.trim().to_lowercase();

    let mut located: Vec<LocatedLocation> = locations
        .iter()
        .filter_map(|location| {
            let distance = distance_between(current, location.coordinate());
            let in_range = parse_distance(&distance) <= range_km;
            let matches = location.locale.to_lowercase().contains(&needle);
            (in_range && matches).then(|| LocatedLocation {
                location: location.clone(),
                distance,
            })
        })
        .collect();

    located.sort_by(|a, b| a.distance_km().total_cmp(&b.distance_km()));
    located
}
