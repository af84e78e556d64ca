//! Visits: places where the user spent some time.

use serde::{Deserialize, Serialize};

use crate::location::Coordinate;
use crate::time::Timestamp;

/// A visit detected by the location service.
///
/// `arrival` is `None` when the service did not observe the arrival;
/// `departure` is `None` while the visit is still ongoing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub coordinate: Coordinate,
    pub horizontal_accuracy: f64,
    pub arrival: Option<Timestamp>,
    pub departure: Option<Timestamp>,
}

impl Visit {
    /// Whether the user is still at this place.
    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.departure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_report_ongoing_until_departure_is_known() {
        let mut visit = Visit {
            coordinate: Coordinate::new(1.0, 2.0),
            horizontal_accuracy: 50.0,
            arrival: Some(now()),
            departure: None,
        };
        assert!(visit.is_ongoing());
        visit.departure = Some(now());
        assert!(!visit.is_ongoing());
    }
}
