//! Delegate bridge: the single delegate registered with the hardware.
//!
//! Each callback becomes exactly one [`Action`], broadcast to every
//! attached [`ActionStream`]. The hardware only holds a weak reference to
//! the bridge; the adapter that created it and every stream obtained from
//! [`DelegateBridge::subscribe`] hold strong ones. Once all of them are
//! gone the bridge is released and its streams complete.

use std::sync::Arc;

use locport_domain::action::Action;
use locport_domain::authorization::{AccuracyAuthorization, AuthorizationStatus};
use locport_domain::beacon::{Beacon, BeaconIdentityConstraint};
use locport_domain::error::LocationError;
use locport_domain::heading::Heading;
use locport_domain::location::Location;
use locport_domain::region::{Region, RegionState};
use locport_domain::visit::Visit;

use crate::action_bus::{ActionBroadcaster, ActionStream};
use crate::ports::LocationDelegate;

#[derive(Default)]
pub struct DelegateBridge {
    actions: ActionBroadcaster,
}

impl DelegateBridge {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a subscriber. The stream keeps this bridge alive.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>) -> ActionStream {
        self.actions.subscribe_with(Arc::clone(self))
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.actions.subscriber_count()
    }

    fn emit(&self, action: Action) {
        let name = action.name();
        if let Some(error) = action.error() {
            tracing::debug!(action = name, %error, "location service reported a failure");
        }
        let delivered = self.actions.send(action);
        tracing::trace!(action = name, subscribers = delivered, "delegate callback");
    }
}

impl Drop for DelegateBridge {
    fn drop(&mut self) {
        tracing::debug!("location delegate released");
    }
}

impl LocationDelegate for DelegateBridge {
    fn did_change_authorization(&self, status: AuthorizationStatus) {
        self.emit(Action::DidChangeAuthorization(status));
    }

    fn did_change_accuracy_authorization(&self, accuracy: AccuracyAuthorization) {
        self.emit(Action::DidChangeAccuracyAuthorization(accuracy));
    }

    fn did_update_locations(&self, locations: Vec<Location>) {
        self.emit(Action::DidUpdateLocations(locations));
    }

    fn did_fail_with_error(&self, error: LocationError) {
        self.emit(Action::DidFailWithError(error));
    }

    fn did_update_heading(&self, heading: Heading) {
        self.emit(Action::DidUpdateHeading(heading));
    }

    fn did_enter_region(&self, region: Region) {
        self.emit(Action::DidEnterRegion(region));
    }

    fn did_exit_region(&self, region: Region) {
        self.emit(Action::DidExitRegion(region));
    }

    fn did_determine_state(&self, state: RegionState, region: Region) {
        self.emit(Action::DidDetermineState { state, region });
    }

    fn did_start_monitoring(&self, region: Region) {
        self.emit(Action::DidStartMonitoring(region));
    }

    fn monitoring_did_fail(&self, region: Option<Region>, error: LocationError) {
        self.emit(Action::MonitoringDidFail { region, error });
    }

    fn did_finish_deferred_updates(&self, error: Option<LocationError>) {
        self.emit(Action::DidFinishDeferredUpdates(error));
    }

    fn did_pause_location_updates(&self) {
        self.emit(Action::DidPauseLocationUpdates);
    }

    fn did_resume_location_updates(&self) {
        self.emit(Action::DidResumeLocationUpdates);
    }

    fn did_range(&self, beacons: Vec<Beacon>, constraint: BeaconIdentityConstraint) {
        self.emit(Action::DidRange {
            beacons,
            constraint,
        });
    }

    fn did_fail_ranging(&self, constraint: BeaconIdentityConstraint, error: LocationError) {
        self.emit(Action::DidFailRanging { constraint, error });
    }

    fn did_visit(&self, visit: Visit) {
        self.emit(Action::DidVisit(visit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locport_domain::error::ErrorCode;
    use locport_domain::location::Coordinate;
    use locport_domain::time::Timestamp;

    fn fix(lat: f64, lon: f64) -> Location {
        Location::new(Coordinate::new(lat, lon), Timestamp::default())
    }

    #[tokio::test]
    async fn should_translate_each_callback_into_one_action_in_order() {
        let bridge = DelegateBridge::new();
        let mut rx = bridge.subscribe();
        let p1 = fix(48.85, 2.35);

        bridge.did_change_authorization(AuthorizationStatus::Denied);
        bridge.did_update_locations(vec![p1.clone()]);
        drop(bridge);

        assert_eq!(
            rx.recv().await,
            Some(Action::DidChangeAuthorization(AuthorizationStatus::Denied))
        );
        assert_eq!(rx.recv().await, Some(Action::DidUpdateLocations(vec![p1])));
    }

    #[tokio::test]
    async fn should_keep_batched_fixes_in_a_single_action() {
        let bridge = DelegateBridge::new();
        let mut rx = bridge.subscribe();
        let batch = vec![fix(1.0, 1.0), fix(2.0, 2.0), fix(3.0, 3.0)];

        bridge.did_update_locations(batch.clone());

        assert_eq!(rx.recv().await, Some(Action::DidUpdateLocations(batch)));
    }

    #[tokio::test]
    async fn should_translate_failures_into_actions() {
        let bridge = DelegateBridge::new();
        let mut rx = bridge.subscribe();
        let error = LocationError::new(ErrorCode::RegionMonitoringFailure).with_sub_code(2);

        bridge.monitoring_did_fail(None, error.clone());
        bridge.did_finish_deferred_updates(None);

        assert_eq!(
            rx.recv().await,
            Some(Action::MonitoringDidFail {
                region: None,
                error,
            })
        );
        assert_eq!(rx.recv().await, Some(Action::DidFinishDeferredUpdates(None)));
    }

    #[tokio::test]
    async fn should_stay_alive_while_a_stream_exists() {
        let bridge = DelegateBridge::new();
        let weak = Arc::downgrade(&bridge);
        let mut rx = bridge.subscribe();
        drop(bridge);

        let alive = weak.upgrade().expect("stream keeps the bridge alive");
        alive.did_pause_location_updates();
        drop(alive);
        assert_eq!(rx.recv().await, Some(Action::DidPauseLocationUpdates));

        drop(rx);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn should_count_subscribers() {
        let bridge = DelegateBridge::new();
        let a = bridge.subscribe();
        let b = bridge.subscribe();
        assert_eq!(bridge.subscriber_count(), 2);
        drop(a);
        drop(b);
        assert_eq!(bridge.subscriber_count(), 0);
    }
}
