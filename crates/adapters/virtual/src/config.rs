//! Virtual hardware configuration.

use serde::Deserialize;

use locport_domain::authorization::{AccuracyAuthorization, AuthorizationStatus};
use locport_domain::error::ErrorCode;
use locport_domain::location::Coordinate;

use crate::FullAccuracyOutcome;

/// Initial state and scripted behaviour of a [`VirtualLocationHardware`].
///
/// [`VirtualLocationHardware`]: crate::VirtualLocationHardware
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Authorization status before any request.
    pub authorization: AuthorizationStatus,
    /// Status the simulated user picks when prompted.
    pub prompt_answer: AuthorizationStatus,
    pub accuracy: AccuracyAuthorization,
    /// Whether the simulated user accepts temporary full accuracy.
    pub grant_full_accuracy: bool,
    pub location_services_enabled: bool,
    pub ranging_available: bool,
    /// Largest circular region radius accepted by `start_monitoring`, in metres.
    pub maximum_region_monitoring_distance: f64,
    /// Delay between two replayed waypoints, in milliseconds.
    pub replay_interval_ms: u64,
    /// Waypoints replayed once location updates start.
    pub route: Vec<Coordinate>,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            authorization: AuthorizationStatus::NotDetermined,
            prompt_answer: AuthorizationStatus::AuthorizedWhenInUse,
            accuracy: AccuracyAuthorization::FullAccuracy,
            grant_full_accuracy: true,
            location_services_enabled: true,
            ranging_available: false,
            maximum_region_monitoring_distance: 10_000.0,
            replay_interval_ms: 1_000,
            route: Vec::new(),
        }
    }
}

impl VirtualConfig {
    /// Outcome of a temporary full accuracy prompt.
    #[must_use]
    pub fn full_accuracy_outcome(&self) -> FullAccuracyOutcome {
        if self.grant_full_accuracy {
            FullAccuracyOutcome::Grant
        } else {
            FullAccuracyOutcome::Deny(ErrorCode::PromptDeclined)
        }
    }
}
