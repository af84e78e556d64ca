//! Hardware call log entries.

use locport_domain::beacon::BeaconIdentityConstraint;
use locport_domain::properties::{ActivityType, HeadingOrientation};
use locport_domain::region::Region;

/// One invocation received by the virtual hardware.
#[derive(Debug, Clone, PartialEq)]
pub enum HardwareCall {
    SetDelegate,
    RequestAlwaysAuthorization,
    RequestWhenInUseAuthorization,
    RequestLocation,
    StartUpdatingLocation,
    StopUpdatingLocation,
    StartUpdatingHeading,
    StopUpdatingHeading,
    StartMonitoringSignificantLocationChanges,
    StopMonitoringSignificantLocationChanges,
    StartMonitoringVisits,
    StopMonitoringVisits,
    StartMonitoring(Region),
    StopMonitoring(Region),
    RequestState(Region),
    StartRangingBeacons(BeaconIdentityConstraint),
    StopRangingBeacons(BeaconIdentityConstraint),
    DismissHeadingCalibrationDisplay,
    RequestTemporaryFullAccuracyAuthorization { purpose_key: String },
    SetActivityType(ActivityType),
    SetAllowsBackgroundLocationUpdates(bool),
    SetDesiredAccuracy(f64),
    SetDistanceFilter(f64),
    SetHeadingFilter(f64),
    SetHeadingOrientation(HeadingOrientation),
    SetPausesLocationUpdatesAutomatically(bool),
    SetShowsBackgroundLocationIndicator(bool),
}

impl HardwareCall {
    /// Whether this call changed an attribute.
    #[must_use]
    pub fn is_setter(&self) -> bool {
        matches!(
            self,
            Self::SetActivityType(_)
                | Self::SetAllowsBackgroundLocationUpdates(_)
                | Self::SetDesiredAccuracy(_)
                | Self::SetDistanceFilter(_)
                | Self::SetHeadingFilter(_)
                | Self::SetHeadingOrientation(_)
                | Self::SetPausesLocationUpdatesAutomatically(_)
                | Self::SetShowsBackgroundLocationIndicator(_)
        )
    }
}
