//! The location capability interface.
//!
//! [`LocationManager`] is a record of operations, not a trait object: each
//! field is an independently assignable closure. Application code depends
//! only on this record; which implementation sits behind it (live
//! hardware, the deterministic mock, the strict failing double) is decided
//! by whoever constructs it.
//!
//! Error policy:
//! - queries never fail; they answer an empty or "unavailable" value
//! - commands never fail synchronously; failures surface later as actions
//! - only [`request_temporary_full_accuracy_authorization`] returns an error
//!
//! [`request_temporary_full_accuracy_authorization`]: LocationManager::request_temporary_full_accuracy_authorization

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use locport_domain::authorization::{AccuracyAuthorization, AuthorizationStatus};
use locport_domain::beacon::BeaconIdentityConstraint;
use locport_domain::error::LocationError;
use locport_domain::heading::Heading;
use locport_domain::location::Location;
use locport_domain::properties::Properties;
use locport_domain::region::Region;

use crate::action_bus::ActionStream;

/// Boxed, sendable future returned by the one-shot operation.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A side-effect-free read.
pub type Query<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A fire-and-forget command without arguments.
pub type Command = Arc<dyn Fn() + Send + Sync>;

/// A fire-and-forget command taking one argument.
pub type CommandWith<A> = Arc<dyn Fn(A) + Send + Sync>;

/// The one fallible asynchronous command.
pub type OneShot<A> = Arc<dyn Fn(A) -> BoxFuture<Result<(), LocationError>> + Send + Sync>;

/// Capability interface over a location service.
#[derive(Clone)]
pub struct LocationManager {
    pub authorization_status: Query<AuthorizationStatus>,
    /// `None` where accuracy authorization does not exist.
    pub accuracy_authorization: Query<Option<AccuracyAuthorization>>,
    pub location: Query<Option<Location>>,
    pub heading: Query<Option<Heading>>,
    pub location_services_enabled: Query<bool>,
    pub maximum_region_monitoring_distance: Query<f64>,
    pub monitored_regions: Query<Vec<Region>>,
    pub ranged_beacon_constraints: Query<Vec<BeaconIdentityConstraint>>,
    pub heading_available: Query<bool>,
    pub ranging_available: Query<bool>,
    pub significant_location_change_monitoring_available: Query<bool>,
    pub region_monitoring_available: Query<bool>,

    pub request_always_authorization: Command,
    pub request_when_in_use_authorization: Command,
    pub request_location: Command,
    pub start_updating_location: Command,
    pub stop_updating_location: Command,
    pub start_updating_heading: Command,
    pub stop_updating_heading: Command,
    pub start_monitoring_significant_location_changes: Command,
    pub stop_monitoring_significant_location_changes: Command,
    pub start_monitoring_visits: Command,
    pub stop_monitoring_visits: Command,
    pub start_monitoring: CommandWith<Region>,
    pub stop_monitoring: CommandWith<Region>,
    pub request_state: CommandWith<Region>,
    pub start_ranging_beacons: CommandWith<BeaconIdentityConstraint>,
    pub stop_ranging_beacons: CommandWith<BeaconIdentityConstraint>,
    pub dismiss_heading_calibration_display: Command,
    pub set: CommandWith<Properties>,

    pub request_temporary_full_accuracy_authorization: OneShot<String>,

    /// Attach to the action stream. Every call observes the same logical
    /// stream; no call re-registers with the hardware.
    pub delegate: Query<ActionStream>,
}

impl LocationManager {
    #[must_use]
    pub fn authorization_status(&self) -> AuthorizationStatus {
        (self.authorization_status)()
    }

    #[must_use]
    pub fn accuracy_authorization(&self) -> Option<AccuracyAuthorization> {
        (self.accuracy_authorization)()
    }

    #[must_use]
    pub fn location(&self) -> Option<Location> {
        (self.location)()
    }

    #[must_use]
    pub fn heading(&self) -> Option<Heading> {
        (self.heading)()
    }

    #[must_use]
    pub fn location_services_enabled(&self) -> bool {
        (self.location_services_enabled)()
    }

    #[must_use]
    pub fn maximum_region_monitoring_distance(&self) -> f64 {
        (self.maximum_region_monitoring_distance)()
    }

    #[must_use]
    pub fn monitored_regions(&self) -> Vec<Region> {
        (self.monitored_regions)()
    }

    #[must_use]
    pub fn ranged_beacon_constraints(&self) -> Vec<BeaconIdentityConstraint> {
        (self.ranged_beacon_constraints)()
    }

    #[must_use]
    pub fn heading_available(&self) -> bool {
        (self.heading_available)()
    }

    #[must_use]
    pub fn ranging_available(&self) -> bool {
        (self.ranging_available)()
    }

    #[must_use]
    pub fn significant_location_change_monitoring_available(&self) -> bool {
        (self.significant_location_change_monitoring_available)()
    }

    #[must_use]
    pub fn region_monitoring_available(&self) -> bool {
        (self.region_monitoring_available)()
    }

    pub fn request_always_authorization(&self) {
        (self.request_always_authorization)();
    }

    pub fn request_when_in_use_authorization(&self) {
        (self.request_when_in_use_authorization)();
    }

    pub fn request_location(&self) {
        (self.request_location)();
    }

    pub fn start_updating_location(&self) {
        (self.start_updating_location)();
    }

    pub fn stop_updating_location(&self) {
        (self.stop_updating_location)();
    }

    pub fn start_updating_heading(&self) {
        (self.start_updating_heading)();
    }

    pub fn stop_updating_heading(&self) {
        (self.stop_updating_heading)();
    }

    pub fn start_monitoring_significant_location_changes(&self) {
        (self.start_monitoring_significant_location_changes)();
    }

    pub fn stop_monitoring_significant_location_changes(&self) {
        (self.stop_monitoring_significant_location_changes)();
    }

    pub fn start_monitoring_visits(&self) {
        (self.start_monitoring_visits)();
    }

    pub fn stop_monitoring_visits(&self) {
        (self.stop_monitoring_visits)();
    }

    pub fn start_monitoring(&self, region: Region) {
        (self.start_monitoring)(region);
    }

    pub fn stop_monitoring(&self, region: Region) {
        (self.stop_monitoring)(region);
    }

    pub fn request_state(&self, region: Region) {
        (self.request_state)(region);
    }

    pub fn start_ranging_beacons(&self, constraint: BeaconIdentityConstraint) {
        (self.start_ranging_beacons)(constraint);
    }

    pub fn stop_ranging_beacons(&self, constraint: BeaconIdentityConstraint) {
        (self.stop_ranging_beacons)(constraint);
    }

    pub fn dismiss_heading_calibration_display(&self) {
        (self.dismiss_heading_calibration_display)();
    }

    /// Apply the present fields of `properties`; absent fields are left as
    /// they are.
    pub fn set(&self, properties: Properties) {
        (self.set)(properties);
    }

    /// Ask for temporary full accuracy and wait for the answer.
    ///
    /// # Errors
    ///
    /// Returns the [`LocationError`] reported by the service when the
    /// request is declined or fails.
    pub fn request_temporary_full_accuracy_authorization(
        &self,
        purpose_key: impl Into<String>,
    ) -> BoxFuture<Result<(), LocationError>> {
        (self.request_temporary_full_accuracy_authorization)(purpose_key.into())
    }

    /// Attach a new subscriber to the action stream.
    #[must_use]
    pub fn delegate(&self) -> ActionStream {
        (self.delegate)()
    }
}

impl std::fmt::Debug for LocationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationManager").finish_non_exhaustive()
    }
}
