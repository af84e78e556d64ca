//! Beacons and the constraints used to range them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::Timestamp;

/// Identity constraint selecting which beacons to range or monitor.
///
/// `major`/`minor` narrow the match; `None` matches any value. A `minor`
/// without a `major` is meaningless and is ignored by [`matches`](Self::matches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeaconIdentityConstraint {
    pub uuid: Uuid,
    pub major: Option<u16>,
    pub minor: Option<u16>,
}

impl BeaconIdentityConstraint {
    /// Match every beacon advertising `uuid`.
    #[must_use]
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            major: None,
            minor: None,
        }
    }

    #[must_use]
    pub fn with_major(mut self, major: u16) -> Self {
        self.major = Some(major);
        self
    }

    #[must_use]
    pub fn with_minor(mut self, minor: u16) -> Self {
        self.minor = Some(minor);
        self
    }

    /// Whether `beacon` satisfies this constraint.
    #[must_use]
    pub fn matches(&self, beacon: &Beacon) -> bool {
        if beacon.uuid != self.uuid {
            return false;
        }
        match self.major {
            None => true,
            Some(major) if major != beacon.major => false,
            Some(_) => self.minor.is_none_or(|minor| minor == beacon.minor),
        }
    }
}

/// Relative distance bucket of a ranged beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    #[default]
    Unknown,
    Immediate,
    Near,
    Far,
}

/// A beacon observed while ranging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub uuid: Uuid,
    pub major: u16,
    pub minor: u16,
    pub proximity: Proximity,
    /// Estimated distance in metres; negative when unknown.
    pub accuracy: f64,
    /// Received signal strength in decibels.
    pub rssi: i32,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn beacon(uuid: Uuid, major: u16, minor: u16) -> Beacon {
        Beacon {
            uuid,
            major,
            minor,
            proximity: Proximity::Near,
            accuracy: 1.2,
            rssi: -60,
            timestamp: now(),
        }
    }

    #[test]
    fn should_match_any_beacon_with_same_uuid() {
        let uuid = Uuid::new_v4();
        let constraint = BeaconIdentityConstraint::new(uuid);
        assert!(constraint.matches(&beacon(uuid, 1, 2)));
        assert!(!constraint.matches(&beacon(Uuid::new_v4(), 1, 2)));
    }

    #[test]
    fn should_narrow_match_by_major_and_minor() {
        let uuid = Uuid::new_v4();
        let constraint = BeaconIdentityConstraint::new(uuid)
            .with_major(7)
            .with_minor(3);
        assert!(constraint.matches(&beacon(uuid, 7, 3)));
        assert!(!constraint.matches(&beacon(uuid, 7, 4)));
        assert!(!constraint.matches(&beacon(uuid, 8, 3)));
    }

    #[test]
    fn should_ignore_minor_without_major() {
        let uuid = Uuid::new_v4();
        let constraint = BeaconIdentityConstraint::new(uuid).with_minor(3);
        assert!(constraint.matches(&beacon(uuid, 1, 9)));
    }
}
