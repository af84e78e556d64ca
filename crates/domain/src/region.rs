//! Monitored regions.

use serde::{Deserialize, Serialize};

use crate::beacon::BeaconIdentityConstraint;
use crate::location::Coordinate;

/// Geometry or identity that defines a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionKind {
    /// A circle around `center` with `radius` metres.
    Circular { center: Coordinate, radius: f64 },
    /// The area in which beacons matching the constraint can be heard.
    Beacon(BeaconIdentityConstraint),
}

/// A region the location service can monitor for entry and exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Application-chosen identifier; monitoring a region whose identifier is
    /// already monitored replaces it.
    pub identifier: String,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
    pub kind: RegionKind,
}

impl Region {
    /// A circular region notifying on both entry and exit.
    #[must_use]
    pub fn circular(identifier: impl Into<String>, center: Coordinate, radius: f64) -> Self {
        Self {
            identifier: identifier.into(),
            notify_on_entry: true,
            notify_on_exit: true,
            kind: RegionKind::Circular { center, radius },
        }
    }

    /// A beacon region notifying on both entry and exit.
    #[must_use]
    pub fn beacon(identifier: impl Into<String>, constraint: BeaconIdentityConstraint) -> Self {
        Self {
            identifier: identifier.into(),
            notify_on_entry: true,
            notify_on_exit: true,
            kind: RegionKind::Beacon(constraint),
        }
    }

    /// Whether `coordinate` lies inside a circular region.
    ///
    /// Beacon regions have no geometry and never contain a coordinate.
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        match &self.kind {
            RegionKind::Circular { center, radius } => center.distance_to(coordinate) <= *radius,
            RegionKind::Beacon(_) => false,
        }
    }
}

/// Relationship between the device and a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionState {
    #[default]
    Unknown,
    Inside,
    Outside,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn should_contain_coordinate_within_radius() {
        let region = Region::circular("office", Coordinate::new(48.8566, 2.3522), 200.0);
        assert!(region.contains(&Coordinate::new(48.8570, 2.3525)));
        assert!(!region.contains(&Coordinate::new(48.8666, 2.3522)));
    }

    #[test]
    fn should_never_contain_coordinate_in_beacon_region() {
        let region = Region::beacon("lobby", BeaconIdentityConstraint::new(Uuid::new_v4()));
        assert!(!region.contains(&Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn should_compare_regions_by_every_field() {
        let a = Region::circular("home", Coordinate::new(1.0, 1.0), 100.0);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.notify_on_exit = false;
        assert_ne!(a, b);
    }
}
