//! Location fixes.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Mean Earth radius in metres, used for great-circle distances.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A latitude/longitude pair in degrees (WGS 84).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components fall inside their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other`, in metres (haversine).
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

/// A single position fix as reported by the location service.
///
/// Accuracy fields are in metres; a negative value means the corresponding
/// reading is invalid. `course` is in degrees from true north, `speed` in
/// metres per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinate: Coordinate,
    pub altitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    pub course: f64,
    pub course_accuracy: f64,
    pub speed: f64,
    pub speed_accuracy: f64,
    pub floor: Option<i32>,
    pub timestamp: Timestamp,
}

impl Location {
    /// A fix at `coordinate` with every secondary reading marked invalid.
    #[must_use]
    pub fn new(coordinate: Coordinate, timestamp: Timestamp) -> Self {
        Self {
            coordinate,
            altitude: 0.0,
            horizontal_accuracy: 0.0,
            vertical_accuracy: -1.0,
            course: -1.0,
            course_accuracy: -1.0,
            speed: -1.0,
            speed_accuracy: -1.0,
            floor: None,
            timestamp,
        }
    }

    /// Whether the horizontal position is usable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.horizontal_accuracy >= 0.0 && self.coordinate.is_valid()
    }

    /// Distance to another fix, in metres.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.coordinate.distance_to(&other.coordinate)
    }
}
