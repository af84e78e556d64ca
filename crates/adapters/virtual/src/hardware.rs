//! In-memory location hardware.
//!
//! [`VirtualLocationHardware`] holds the state a real location service
//! would hold and reacts to commands the way a device does: prompts answer
//! with the configured status, `request_location` delivers the last fix,
//! circular regions report entry and exit as the simulated position moves.
//! Every call is logged so tests can assert what reached the hardware.
//!
//! Cloning shares the same device.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use locport_app::Completion;
use locport_app::ports::{LocationDelegate, LocationHardware};
use locport_domain::authorization::{AccuracyAuthorization, AuthorizationStatus};
use locport_domain::beacon::{Beacon, BeaconIdentityConstraint};
use locport_domain::error::{ErrorCode, LocationError};
use locport_domain::heading::Heading;
use locport_domain::location::{Coordinate, Location};
use locport_domain::properties::{ActivityType, HeadingOrientation, Properties};
use locport_domain::region::{Region, RegionKind, RegionState};
use locport_domain::visit::Visit;

use crate::call::HardwareCall;
use crate::config::VirtualConfig;

/// How the simulated user answers a temporary full accuracy prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullAccuracyOutcome {
    Grant,
    Deny(ErrorCode),
    /// Drop the completion without answering.
    Ignore,
}

enum Transition {
    Enter(Region),
    Exit(Region),
}

#[allow(clippy::struct_excessive_bools)]
struct State {
    authorization: AuthorizationStatus,
    prompt_answer: AuthorizationStatus,
    accuracy: AccuracyAuthorization,
    full_accuracy: FullAccuracyOutcome,
    location: Option<Location>,
    heading: Option<Heading>,
    services_enabled: bool,
    ranging_available: bool,
    maximum_region_monitoring_distance: f64,
    monitored: Vec<Region>,
    inside: BTreeSet<String>,
    ranged: Vec<BeaconIdentityConstraint>,
    properties: Properties,
    updating_location: bool,
    updating_heading: bool,
    significant_changes: bool,
    visits: bool,
}

impl State {
    fn new(config: &VirtualConfig) -> Self {
        Self {
            authorization: config.authorization,
            prompt_answer: config.prompt_answer,
            accuracy: config.accuracy,
            full_accuracy: config.full_accuracy_outcome(),
            location: None,
            heading: None,
            services_enabled: config.location_services_enabled,
            ranging_available: config.ranging_available,
            maximum_region_monitoring_distance: config.maximum_region_monitoring_distance,
            monitored: Vec::new(),
            inside: BTreeSet::new(),
            ranged: Vec::new(),
            properties: Properties::default(),
            updating_location: false,
            updating_heading: false,
            significant_changes: false,
            visits: false,
        }
    }

    fn can_locate(&self) -> bool {
        self.services_enabled && self.authorization.is_authorized()
    }

    fn region_transitions(&mut self, coordinate: &Coordinate) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for region in &self.monitored {
            let inside = region.contains(coordinate);
            let was_inside = self.inside.contains(&region.identifier);
            if inside && !was_inside {
                self.inside.insert(region.identifier.clone());
                if region.notify_on_entry {
                    transitions.push(Transition::Enter(region.clone()));
                }
            } else if !inside && was_inside {
                self.inside.remove(&region.identifier);
                if region.notify_on_exit {
                    transitions.push(Transition::Exit(region.clone()));
                }
            }
        }
        transitions
    }
}

struct Inner {
    state: Mutex<State>,
    delegate: Mutex<Option<Weak<dyn LocationDelegate>>>,
    calls: Mutex<Option<mpsc::UnboundedSender<HardwareCall>>>,
    history: Mutex<Vec<HardwareCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scriptable in-memory location service.
#[derive(Clone)]
pub struct VirtualLocationHardware {
    inner: Arc<Inner>,
}

impl Default for VirtualLocationHardware {
    fn default() -> Self {
        Self::new(&VirtualConfig::default())
    }
}

impl VirtualLocationHardware {
    #[must_use]
    pub fn new(config: &VirtualConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::new(config)),
                delegate: Mutex::new(None),
                calls: Mutex::new(None),
                history: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Receive every call made from now on. Replaces any previous receiver.
    #[must_use]
    pub fn calls(&self) -> mpsc::UnboundedReceiver<HardwareCall> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *lock(&self.inner.calls) = Some(sender);
        receiver
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<HardwareCall> {
        lock(&self.inner.history).clone()
    }

    /// Attributes applied so far.
    #[must_use]
    pub fn properties(&self) -> Properties {
        lock(&self.inner.state).properties.clone()
    }

    #[must_use]
    pub fn is_updating_location(&self) -> bool {
        lock(&self.inner.state).updating_location
    }

    #[must_use]
    pub fn is_updating_heading(&self) -> bool {
        lock(&self.inner.state).updating_heading
    }

    #[must_use]
    pub fn is_monitoring_significant_location_changes(&self) -> bool {
        lock(&self.inner.state).significant_changes
    }

    #[must_use]
    pub fn is_monitoring_visits(&self) -> bool {
        lock(&self.inner.state).visits
    }

    /// Whether a delegate is registered and still alive.
    #[must_use]
    pub fn has_delegate(&self) -> bool {
        self.delegate().is_some()
    }

    pub fn set_full_accuracy_outcome(&self, outcome: FullAccuracyOutcome) {
        lock(&self.inner.state).full_accuracy = outcome;
    }

    pub fn set_location_services_enabled(&self, enabled: bool) {
        lock(&self.inner.state).services_enabled = enabled;
    }

    /// Move the simulated device.
    ///
    /// Delivers the fix when location updates are running, then reports
    /// entry into and exit from monitored circular regions.
    pub fn move_to(&self, location: Location) {
        let (updating, transitions) = {
            let mut state = lock(&self.inner.state);
            state.location = Some(location.clone());
            let transitions = state.region_transitions(&location.coordinate);
            (state.updating_location && state.can_locate(), transitions)
        };

        if updating {
            self.notify("did_update_locations", |d| {
                d.did_update_locations(vec![location]);
            });
        }
        for transition in transitions {
            match transition {
                Transition::Enter(region) => {
                    self.notify("did_enter_region", |d| d.did_enter_region(region));
                }
                Transition::Exit(region) => {
                    self.notify("did_exit_region", |d| d.did_exit_region(region));
                }
            }
        }
    }

    pub fn emit_authorization(&self, status: AuthorizationStatus) {
        lock(&self.inner.state).authorization = status;
        self.notify("did_change_authorization", |d| {
            d.did_change_authorization(status);
        });
    }

    pub fn emit_accuracy_authorization(&self, accuracy: AccuracyAuthorization) {
        lock(&self.inner.state).accuracy = accuracy;
        self.notify("did_change_accuracy_authorization", |d| {
            d.did_change_accuracy_authorization(accuracy);
        });
    }

    /// Deliver a batch of fixes as is; the last one becomes the current
    /// location.
    pub fn emit_locations(&self, locations: Vec<Location>) {
        if let Some(last) = locations.last() {
            lock(&self.inner.state).location = Some(last.clone());
        }
        self.notify("did_update_locations", |d| d.did_update_locations(locations));
    }

    pub fn emit_error(&self, error: LocationError) {
        self.notify("did_fail_with_error", |d| d.did_fail_with_error(error));
    }

    pub fn emit_heading(&self, heading: Heading) {
        lock(&self.inner.state).heading = Some(heading.clone());
        self.notify("did_update_heading", |d| d.did_update_heading(heading));
    }

    pub fn emit_enter(&self, region: Region) {
        self.notify("did_enter_region", |d| d.did_enter_region(region));
    }

    pub fn emit_exit(&self, region: Region) {
        self.notify("did_exit_region", |d| d.did_exit_region(region));
    }

    pub fn emit_state(&self, state: RegionState, region: Region) {
        self.notify("did_determine_state", |d| {
            d.did_determine_state(state, region);
        });
    }

    pub fn emit_monitoring_failure(&self, region: Option<Region>, error: LocationError) {
        self.notify("monitoring_did_fail", |d| d.monitoring_did_fail(region, error));
    }

    pub fn emit_deferred_finished(&self, error: Option<LocationError>) {
        self.notify("did_finish_deferred_updates", |d| {
            d.did_finish_deferred_updates(error);
        });
    }

    pub fn emit_pause(&self) {
        self.notify("did_pause_location_updates", |d| {
            d.did_pause_location_updates();
        });
    }

    pub fn emit_resume(&self) {
        self.notify("did_resume_location_updates", |d| {
            d.did_resume_location_updates();
        });
    }

    pub fn emit_range(&self, beacons: Vec<Beacon>, constraint: BeaconIdentityConstraint) {
        self.notify("did_range", |d| d.did_range(beacons, constraint));
    }

    pub fn emit_ranging_failure(&self, constraint: BeaconIdentityConstraint, error: LocationError) {
        self.notify("did_fail_ranging", |d| d.did_fail_ranging(constraint, error));
    }

    pub fn emit_visit(&self, visit: Visit) {
        self.notify("did_visit", |d| d.did_visit(visit));
    }

    fn delegate(&self) -> Option<Arc<dyn LocationDelegate>> {
        lock(&self.inner.delegate).as_ref().and_then(Weak::upgrade)
    }

    fn notify(&self, callback: &'static str, deliver: impl FnOnce(&dyn LocationDelegate)) {
        match self.delegate() {
            Some(delegate) => deliver(delegate.as_ref()),
            None => tracing::trace!(callback, "no delegate registered, dropping callback"),
        }
    }

    fn record(&self, call: HardwareCall) {
        tracing::trace!(?call, "virtual hardware call");
        let mut sender = lock(&self.inner.calls);
        if let Some(tx) = sender.as_ref()
            && tx.send(call.clone()).is_err()
        {
            *sender = None;
        }
        drop(sender);
        lock(&self.inner.history).push(call);
    }

    fn prompt(&self, always: bool) {
        let changed = {
            let mut state = lock(&self.inner.state);
            let eligible = match state.authorization {
                AuthorizationStatus::NotDetermined => true,
                AuthorizationStatus::AuthorizedWhenInUse => always,
                _ => false,
            };
            let answer = if always && state.prompt_answer.is_authorized() {
                AuthorizationStatus::AuthorizedAlways
            } else {
                state.prompt_answer
            };
            if eligible && answer != state.authorization {
                state.authorization = answer;
                Some(answer)
            } else {
                None
            }
        };

        if let Some(status) = changed {
            self.notify("did_change_authorization", |d| {
                d.did_change_authorization(status);
            });
        }
    }

    fn update_properties(&self, call: HardwareCall, apply: impl FnOnce(&mut Properties)) {
        apply(&mut lock(&self.inner.state).properties);
        self.record(call);
    }
}

impl std::fmt::Debug for VirtualLocationHardware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualLocationHardware")
            .field("has_delegate", &self.has_delegate())
            .finish_non_exhaustive()
    }
}

impl LocationHardware for VirtualLocationHardware {
    fn set_delegate(&self, delegate: Weak<dyn LocationDelegate>) {
        *lock(&self.inner.delegate) = Some(delegate);
        self.record(HardwareCall::SetDelegate);
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        lock(&self.inner.state).authorization
    }

    fn accuracy_authorization(&self) -> AccuracyAuthorization {
        lock(&self.inner.state).accuracy
    }

    fn location(&self) -> Option<Location> {
        lock(&self.inner.state).location.clone()
    }

    fn heading(&self) -> Option<Heading> {
        lock(&self.inner.state).heading.clone()
    }

    fn location_services_enabled(&self) -> bool {
        lock(&self.inner.state).services_enabled
    }

    fn maximum_region_monitoring_distance(&self) -> f64 {
        lock(&self.inner.state).maximum_region_monitoring_distance
    }

    fn monitored_regions(&self) -> Vec<Region> {
        lock(&self.inner.state).monitored.clone()
    }

    fn ranged_beacon_constraints(&self) -> Vec<BeaconIdentityConstraint> {
        lock(&self.inner.state).ranged.clone()
    }

    fn heading_available(&self) -> bool {
        true
    }

    fn ranging_available(&self) -> bool {
        lock(&self.inner.state).ranging_available
    }

    fn significant_location_change_monitoring_available(&self) -> bool {
        true
    }

    fn region_monitoring_available(&self) -> bool {
        true
    }

    fn request_always_authorization(&self) {
        self.record(HardwareCall::RequestAlwaysAuthorization);
        self.prompt(true);
    }

    fn request_when_in_use_authorization(&self) {
        self.record(HardwareCall::RequestWhenInUseAuthorization);
        self.prompt(false);
    }

    fn request_location(&self) {
        self.record(HardwareCall::RequestLocation);
        let reply = {
            let state = lock(&self.inner.state);
            if state.can_locate() {
                state.location.clone().ok_or(ErrorCode::LocationUnknown)
            } else {
                Err(ErrorCode::Denied)
            }
        };

        match reply {
            Ok(location) => self.notify("did_update_locations", |d| {
                d.did_update_locations(vec![location]);
            }),
            Err(code) => self.notify("did_fail_with_error", |d| {
                d.did_fail_with_error(LocationError::new(code));
            }),
        }
    }

    fn start_updating_location(&self) {
        self.record(HardwareCall::StartUpdatingLocation);
        let reply = {
            let mut state = lock(&self.inner.state);
            state.updating_location = true;
            if state.can_locate() {
                Ok(state.location.clone())
            } else {
                Err(ErrorCode::Denied)
            }
        };

        match reply {
            Ok(Some(location)) => self.notify("did_update_locations", |d| {
                d.did_update_locations(vec![location]);
            }),
            Ok(None) => {}
            Err(code) => self.notify("did_fail_with_error", |d| {
                d.did_fail_with_error(LocationError::new(code));
            }),
        }
    }

    fn stop_updating_location(&self) {
        self.record(HardwareCall::StopUpdatingLocation);
        lock(&self.inner.state).updating_location = false;
    }

    fn start_updating_heading(&self) {
        self.record(HardwareCall::StartUpdatingHeading);
        let heading = {
            let mut state = lock(&self.inner.state);
            state.updating_heading = true;
            state.heading.clone()
        };
        if let Some(heading) = heading {
            self.notify("did_update_heading", |d| d.did_update_heading(heading));
        }
    }

    fn stop_updating_heading(&self) {
        self.record(HardwareCall::StopUpdatingHeading);
        lock(&self.inner.state).updating_heading = false;
    }

    fn start_monitoring_significant_location_changes(&self) {
        self.record(HardwareCall::StartMonitoringSignificantLocationChanges);
        lock(&self.inner.state).significant_changes = true;
    }

    fn stop_monitoring_significant_location_changes(&self) {
        self.record(HardwareCall::StopMonitoringSignificantLocationChanges);
        lock(&self.inner.state).significant_changes = false;
    }

    fn start_monitoring_visits(&self) {
        self.record(HardwareCall::StartMonitoringVisits);
        lock(&self.inner.state).visits = true;
    }

    fn stop_monitoring_visits(&self) {
        self.record(HardwareCall::StopMonitoringVisits);
        lock(&self.inner.state).visits = false;
    }

    fn start_monitoring(&self, region: Region) {
        self.record(HardwareCall::StartMonitoring(region.clone()));
        let accepted = {
            let mut state = lock(&self.inner.state);
            if !state.authorization.is_authorized() {
                Err(ErrorCode::RegionMonitoringDenied)
            } else if let RegionKind::Circular { radius, .. } = region.kind
                && radius > state.maximum_region_monitoring_distance
            {
                Err(ErrorCode::RegionMonitoringFailure)
            } else {
                state.monitored.retain(|r| r.identifier != region.identifier);
                state.inside.remove(&region.identifier);
                if let Some(location) = &state.location
                    && region.contains(&location.coordinate)
                {
                    state.inside.insert(region.identifier.clone());
                }
                state.monitored.push(region.clone());
                Ok(())
            }
        };

        match accepted {
            Ok(()) => self.notify("did_start_monitoring", |d| d.did_start_monitoring(region)),
            Err(code) => self.notify("monitoring_did_fail", |d| {
                d.monitoring_did_fail(Some(region), LocationError::new(code));
            }),
        }
    }

    fn stop_monitoring(&self, region: Region) {
        self.record(HardwareCall::StopMonitoring(region.clone()));
        let mut state = lock(&self.inner.state);
        state.monitored.retain(|r| r.identifier != region.identifier);
        state.inside.remove(&region.identifier);
    }

    fn request_state(&self, region: Region) {
        self.record(HardwareCall::RequestState(region.clone()));
        let location = lock(&self.inner.state).location.clone();
        let state = match (&region.kind, location) {
            (RegionKind::Circular { .. }, Some(location)) => {
                if region.contains(&location.coordinate) {
                    RegionState::Inside
                } else {
                    RegionState::Outside
                }
            }
            _ => RegionState::Unknown,
        };
        self.notify("did_determine_state", |d| {
            d.did_determine_state(state, region);
        });
    }

    fn start_ranging_beacons(&self, constraint: BeaconIdentityConstraint) {
        self.record(HardwareCall::StartRangingBeacons(constraint));
        let available = {
            let mut state = lock(&self.inner.state);
            if state.ranging_available && !state.ranged.contains(&constraint) {
                state.ranged.push(constraint);
            }
            state.ranging_available
        };
        if !available {
            self.notify("did_fail_ranging", |d| {
                d.did_fail_ranging(constraint, LocationError::new(ErrorCode::RangingUnavailable));
            });
        }
    }

    fn stop_ranging_beacons(&self, constraint: BeaconIdentityConstraint) {
        self.record(HardwareCall::StopRangingBeacons(constraint));
        lock(&self.inner.state).ranged.retain(|c| *c != constraint);
    }

    fn dismiss_heading_calibration_display(&self) {
        self.record(HardwareCall::DismissHeadingCalibrationDisplay);
    }

    fn request_temporary_full_accuracy_authorization(
        &self,
        purpose_key: &str,
        completion: Completion,
    ) {
        self.record(HardwareCall::RequestTemporaryFullAccuracyAuthorization {
            purpose_key: purpose_key.to_owned(),
        });

        let outcome = {
            let mut state = lock(&self.inner.state);
            if state.accuracy == AccuracyAuthorization::FullAccuracy {
                None
            } else {
                if state.full_accuracy == FullAccuracyOutcome::Grant {
                    state.accuracy = AccuracyAuthorization::FullAccuracy;
                }
                Some(state.full_accuracy)
            }
        };

        match outcome {
            None | Some(FullAccuracyOutcome::Grant) => {
                completion.complete(None);
                if outcome.is_some() {
                    self.notify("did_change_accuracy_authorization", |d| {
                        d.did_change_accuracy_authorization(AccuracyAuthorization::FullAccuracy);
                    });
                }
            }
            Some(FullAccuracyOutcome::Deny(code)) => {
                completion.complete(Some(LocationError::new(code)));
            }
            Some(FullAccuracyOutcome::Ignore) => {
                tracing::debug!(purpose_key, "ignoring full accuracy prompt");
                drop(completion);
            }
        }
    }

    fn set_activity_type(&self, value: ActivityType) {
        self.update_properties(HardwareCall::SetActivityType(value), |p| {
            p.activity_type = Some(value);
        });
    }

    fn set_allows_background_location_updates(&self, value: bool) {
        self.update_properties(HardwareCall::SetAllowsBackgroundLocationUpdates(value), |p| {
            p.allows_background_location_updates = Some(value);
        });
    }

    fn set_desired_accuracy(&self, value: f64) {
        self.update_properties(HardwareCall::SetDesiredAccuracy(value), |p| {
            p.desired_accuracy = Some(value);
        });
    }

    fn set_distance_filter(&self, value: f64) {
        self.update_properties(HardwareCall::SetDistanceFilter(value), |p| {
            p.distance_filter = Some(value);
        });
    }

    fn set_heading_filter(&self, value: f64) {
        self.update_properties(HardwareCall::SetHeadingFilter(value), |p| {
            p.heading_filter = Some(value);
        });
    }

    fn set_heading_orientation(&self, value: HeadingOrientation) {
        self.update_properties(HardwareCall::SetHeadingOrientation(value), |p| {
            p.heading_orientation = Some(value);
        });
    }

    fn set_pauses_location_updates_automatically(&self, value: bool) {
        self.update_properties(
            HardwareCall::SetPausesLocationUpdatesAutomatically(value),
            |p| p.pauses_location_updates_automatically = Some(value),
        );
    }

    fn set_shows_background_location_indicator(&self, value: bool) {
        self.update_properties(HardwareCall::SetShowsBackgroundLocationIndicator(value), |p| {
            p.shows_background_location_indicator = Some(value);
        });
    }
}
