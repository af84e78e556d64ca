//! Delegate port: the callback surface of the location hardware.

use locport_domain::authorization::{AccuracyAuthorization, AuthorizationStatus};
use locport_domain::beacon::{Beacon, BeaconIdentityConstraint};
use locport_domain::error::LocationError;
use locport_domain::heading::Heading;
use locport_domain::location::Location;
use locport_domain::region::{Region, RegionState};
use locport_domain::visit::Visit;

/// Receives every notification of one hardware service instance.
///
/// The hardware invokes these methods one at a time, in temporal order, on
/// its own execution context. Implementations must not block.
pub trait LocationDelegate: Send + Sync {
    fn did_change_authorization(&self, status: AuthorizationStatus);

    fn did_change_accuracy_authorization(&self, accuracy: AccuracyAuthorization);

    /// One or more new fixes, oldest first.
    fn did_update_locations(&self, locations: Vec<Location>);

    fn did_fail_with_error(&self, error: LocationError);

    fn did_update_heading(&self, heading: Heading);

    fn did_enter_region(&self, region: Region);

    fn did_exit_region(&self, region: Region);

    fn did_determine_state(&self, state: RegionState, region: Region);

    fn did_start_monitoring(&self, region: Region);

    fn monitoring_did_fail(&self, region: Option<Region>, error: LocationError);

    fn did_finish_deferred_updates(&self, error: Option<LocationError>);

    fn did_pause_location_updates(&self);

    fn did_resume_location_updates(&self);

    fn did_range(&self, beacons: Vec<Beacon>, constraint: BeaconIdentityConstraint);

    fn did_fail_ranging(&self, constraint: BeaconIdentityConstraint, error: LocationError);

    fn did_visit(&self, visit: Visit);
}
