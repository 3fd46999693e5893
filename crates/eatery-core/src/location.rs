//! Geographic positions and walking estimates.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Average walking speed, about 5 km/h.
pub const WALKING_SPEED_MPS: f64 = 1.4;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }

    /// Time to walk to `other` in a straight line, rounded to whole seconds.
    #[allow(clippy::cast_possible_truncation)]
    pub fn walk_time_to(&self, other: &Self) -> Duration {
        let seconds = (self.distance_to(other) / WALKING_SPEED_MPS).round();
        Duration::seconds(seconds as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let here = Location::new(42.4534, -76.4735);
        assert!(here.distance_to(&here).abs() < f64::EPSILON);
        assert_eq!(here.walk_time_to(&here), Duration::zero());
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Location::new(42.0, -76.0);
        let b = Location::new(43.0, -76.0);
        let meters = a.distance_to(&b);
        assert!((meters - 111_195.0).abs() < 10.0, "got {meters}");
    }

    #[test]
    fn walk_time_uses_walking_speed() {
        // ~140 m due north.
        let a = Location::new(42.4470, -76.4830);
        let b = Location::new(42.448_259, -76.4830);
        let seconds = a.walk_time_to(&b).num_seconds();
        assert!((95..=105).contains(&seconds), "got {seconds}s");
    }
}
