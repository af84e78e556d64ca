//! Hardware port: the stateful location service behind the capability
//! interface.
//!
//! The hardware is an opaque provider: read-only accessors, commands whose
//! effects surface later through the delegate, attribute setters, and a
//! single delegate registration point. Every method is a thread-safe entry
//! point and must return promptly.

use std::sync::Weak;

use locport_domain::authorization::{AccuracyAuthorization, AuthorizationStatus};
use locport_domain::beacon::BeaconIdentityConstraint;
use locport_domain::heading::Heading;
use locport_domain::location::Location;
use locport_domain::properties::{ActivityType, HeadingOrientation};
use locport_domain::region::Region;

use crate::completion::Completion;
use crate::ports::LocationDelegate;

/// A hardware-backed location service.
pub trait LocationHardware: Send + Sync {
    /// Register the object receiving every callback of this service.
    ///
    /// The hardware keeps only a weak reference; registering again replaces
    /// the previous delegate.
    fn set_delegate(&self, delegate: Weak<dyn LocationDelegate>);

    // Queries

    fn authorization_status(&self) -> AuthorizationStatus;

    fn accuracy_authorization(&self) -> AccuracyAuthorization;

    /// Most recent fix, if any was ever obtained.
    fn location(&self) -> Option<Location>;

    /// Most recent heading, if heading updates ever ran.
    fn heading(&self) -> Option<Heading>;

    fn location_services_enabled(&self) -> bool;

    /// Largest radius, in metres, a monitored circular region may have.
    fn maximum_region_monitoring_distance(&self) -> f64;

    fn monitored_regions(&self) -> Vec<Region>;

    fn ranged_beacon_constraints(&self) -> Vec<BeaconIdentityConstraint>;

    fn heading_available(&self) -> bool;

    fn ranging_available(&self) -> bool;

    fn significant_location_change_monitoring_available(&self) -> bool;

    fn region_monitoring_available(&self) -> bool;

    // Commands

    fn request_always_authorization(&self);

    fn request_when_in_use_authorization(&self);

    /// Deliver a single fix (or an error) through the delegate.
    fn request_location(&self);

    fn start_updating_location(&self);

    fn stop_updating_location(&self);

    fn start_updating_heading(&self);

    fn stop_updating_heading(&self);

    fn start_monitoring_significant_location_changes(&self);

    fn stop_monitoring_significant_location_changes(&self);

    fn start_monitoring_visits(&self);

    fn stop_monitoring_visits(&self);

    fn start_monitoring(&self, region: Region);

    fn stop_monitoring(&self, region: Region);

    /// Ask for a one-off `did_determine_state` callback for `region`.
    fn request_state(&self, region: Region);

    fn start_ranging_beacons(&self, constraint: BeaconIdentityConstraint);

    fn stop_ranging_beacons(&self, constraint: BeaconIdentityConstraint);

    fn dismiss_heading_calibration_display(&self);

    /// Ask the user for temporary full accuracy.
    ///
    /// The hardware resolves `completion` with `None` on success or the
    /// failure otherwise. Dropping it unresolved is reported to the caller
    /// as a dropped completion.
    fn request_temporary_full_accuracy_authorization(
        &self,
        purpose_key: &str,
        completion: Completion,
    );

    // Attributes

    fn set_activity_type(&self, value: ActivityType);

    fn set_allows_background_location_updates(&self, value: bool);

    fn set_desired_accuracy(&self, value: f64);

    fn set_distance_filter(&self, value: f64);

    fn set_heading_filter(&self, value: f64);

    fn set_heading_orientation(&self, value: HeadingOrientation);

    fn set_pauses_location_updates_automatically(&self, value: bool);

    fn set_shows_background_location_indicator(&self, value: bool);
}
