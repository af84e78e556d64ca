//! Action: an immutable record of one location-service notification.
//!
//! Every delegate callback is translated into exactly one [`Action`].
//! Actions carry no identity beyond their payload: two actions with equal
//! payloads compare equal.

use serde::Serialize;

use crate::authorization::{AccuracyAuthorization, AuthorizationStatus};
use crate::beacon::{Beacon, BeaconIdentityConstraint};
use crate::error::LocationError;
use crate::heading::Heading;
use crate::location::Location;
use crate::region::{Region, RegionState};
use crate::visit::Visit;

/// One notification from the location service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum Action {
    DidChangeAuthorization(AuthorizationStatus),
    DidChangeAccuracyAuthorization(AccuracyAuthorization),
    /// New fixes, oldest first. A single callback may batch several fixes;
    /// they are kept together in one action.
    DidUpdateLocations(Vec<Location>),
    DidFailWithError(LocationError),
    DidUpdateHeading(Heading),
    DidEnterRegion(Region),
    DidExitRegion(Region),
    DidDetermineState {
        state: RegionState,
        region: Region,
    },
    DidStartMonitoring(Region),
    /// `region` is `None` when the service could not tell which region failed.
    MonitoringDidFail {
        region: Option<Region>,
        error: LocationError,
    },
    /// `None` when deferred updates finished normally.
    DidFinishDeferredUpdates(Option<LocationError>),
    DidPauseLocationUpdates,
    DidResumeLocationUpdates,
    DidRange {
        beacons: Vec<Beacon>,
        constraint: BeaconIdentityConstraint,
    },
    DidFailRanging {
        constraint: BeaconIdentityConstraint,
        error: LocationError,
    },
    DidVisit(Visit),
}

impl Action {
    /// Stable snake-case label, used as a logging field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DidChangeAuthorization(_) => "did_change_authorization",
            Self::DidChangeAccuracyAuthorization(_) => "did_change_accuracy_authorization",
            Self::DidUpdateLocations(_) => "did_update_locations",
            Self::DidFailWithError(_) => "did_fail_with_error",
            Self::DidUpdateHeading(_) => "did_update_heading",
            Self::DidEnterRegion(_) => "did_enter_region",
            Self::DidExitRegion(_) => "did_exit_region",
            Self::DidDetermineState { .. } => "did_determine_state",
            Self::DidStartMonitoring(_) => "did_start_monitoring",
            Self::MonitoringDidFail { .. } => "monitoring_did_fail",
            Self::DidFinishDeferredUpdates(_) => "did_finish_deferred_updates",
            Self::DidPauseLocationUpdates => "did_pause_location_updates",
            Self::DidResumeLocationUpdates => "did_resume_location_updates",
            Self::DidRange { .. } => "did_range",
            Self::DidFailRanging { .. } => "did_fail_ranging",
            Self::DidVisit(_) => "did_visit",
        }
    }

    /// The error carried by failure actions.
    #[must_use]
    pub fn error(&self) -> Option<&LocationError> {
        match self {
            Self::DidFailWithError(error)
            | Self::MonitoringDidFail { error, .. }
            | Self::DidFailRanging { error, .. } => Some(error),
            Self::DidFinishDeferredUpdates(error) => error.as_ref(),
            _ => None,
        }
    }
}
