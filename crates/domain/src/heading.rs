//! Compass headings.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A compass reading.
///
/// Headings are in degrees (0..360). A negative `heading_accuracy` means the
/// heading is invalid; `true_heading` is negative when it cannot be derived.
/// `x`, `y`, `z` are the raw geomagnetic field components in microteslas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub magnetic_heading: f64,
    pub true_heading: f64,
    pub heading_accuracy: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp: Timestamp,
}

impl Heading {
    /// Whether the reading can be trusted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.heading_accuracy >= 0.0
    }
}
