//! Test adapters for [`LocationManager`].
//!
//! - [`LocationManager::mock`]: deterministic: every operation is inert and
//!   every field can be reassigned before use.
//! - [`LocationManager::failing`]: strict: every operation records a test
//!   failure in a shared [`TestFailures`] log, then behaves like the mock.
//!   Override exactly the operations a scenario is expected to touch and
//!   assert the log is empty at the end.
//!
//! Inert values: `NotDetermined`, `None`, `false`, `0.0`, empty
//! collections, one-shot resolves `Ok(())`, and `delegate()` returns an
//! already completed stream.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use locport_domain::authorization::AuthorizationStatus;
use locport_domain::error::LocationError;

use crate::action_bus::ActionStream;
use crate::manager::{BoxFuture, Command, CommandWith, LocationManager, OneShot, Query};

/// Shared log of unexpected operations invoked on a failing manager.
///
/// Failures must be drained with [`take`](Self::take) or
/// [`assert_none`](Self::assert_none): when the last handle (including the
/// ones captured by the manager) is dropped with failures still recorded,
/// the drop panics with the list.
#[derive(Clone, Default)]
pub struct TestFailures {
    log: Arc<FailureLog>,
}

#[derive(Default)]
struct FailureLog {
    entries: Mutex<Vec<String>>,
}

impl FailureLog {
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FailureLog {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let entries = std::mem::take(&mut *self.lock());
        assert!(
            entries.is_empty(),
            "unchecked location operations:\n  {}",
            entries.join("\n  ")
        );
    }
}

impl TestFailures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `operation` was invoked without an override.
    pub fn record(&self, operation: &str) {
        let message = format!("LocationManager.{operation} is unimplemented");
        tracing::error!(operation, "unimplemented location operation invoked");
        self.log.lock().push(message);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    /// Drain the recorded failures.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.lock())
    }

    /// Panic with every recorded failure, if any.
    ///
    /// # Panics
    ///
    /// Panics when at least one failure was recorded.
    #[track_caller]
    pub fn assert_none(&self) {
        let failures = self.take();
        assert!(
            failures.is_empty(),
            "unexpected location operations:\n  {}",
            failures.join("\n  ")
        );
    }
}

impl std::fmt::Debug for TestFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.log.lock().iter()).finish()
    }
}

fn query<T>(value: T) -> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    Arc::new(move || value.clone())
}

fn command() -> Command {
    Arc::new(|| {})
}

fn command_with<A: 'static>() -> CommandWith<A> {
    Arc::new(|_: A| {})
}

fn granted_one_shot() -> OneShot<String> {
    Arc::new(|_: String| -> BoxFuture<Result<(), LocationError>> { Box::pin(async { Ok(()) }) })
}

fn failing_query<T>(failures: &TestFailures, name: &'static str, value: T) -> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    let failures = failures.clone();
    Arc::new(move || {
        failures.record(name);
        value.clone()
    })
}

fn failing_command(failures: &TestFailures, name: &'static str) -> Command {
    let failures = failures.clone();
    Arc::new(move || failures.record(name))
}

fn failing_command_with<A: 'static>(failures: &TestFailures, name: &'static str) -> CommandWith<A> {
    let failures = failures.clone();
    Arc::new(move |_: A| failures.record(name))
}

impl LocationManager {
    /// A manager whose every operation is inert.
    #[must_use]
    pub fn mock() -> Self {
        Self {
            authorization_status: query(AuthorizationStatus::NotDetermined),
            accuracy_authorization: query(None),
            location: query(None),
            heading: query(None),
            location_services_enabled: query(false),
            maximum_region_monitoring_distance: query(0.0),
            monitored_regions: query(Vec::new()),
            ranged_beacon_constraints: query(Vec::new()),
            heading_available: query(false),
            ranging_available: query(false),
            significant_location_change_monitoring_available: query(false),
            region_monitoring_available: query(false),
            request_always_authorization: command(),
            request_when_in_use_authorization: command(),
            request_location: command(),
            start_updating_location: command(),
            stop_updating_location: command(),
            start_updating_heading: command(),
            stop_updating_heading: command(),
            start_monitoring_significant_location_changes: command(),
            stop_monitoring_significant_location_changes: command(),
            start_monitoring_visits: command(),
            stop_monitoring_visits: command(),
            start_monitoring: command_with(),
            stop_monitoring: command_with(),
            request_state: command_with(),
            start_ranging_beacons: command_with(),
            stop_ranging_beacons: command_with(),
            dismiss_heading_calibration_display: command(),
            set: command_with(),
            request_temporary_full_accuracy_authorization: granted_one_shot(),
            delegate: Arc::new(ActionStream::empty),
        }
    }

    /// A manager whose every operation records a failure in `failures`
    /// before returning the inert value.
    #[must_use]
    pub fn failing(failures: &TestFailures) -> Self {
        let f = failures;
        Self {
            authorization_status: failing_query(
                f,
                "authorization_status",
                AuthorizationStatus::NotDetermined,
            ),
            accuracy_authorization: failing_query(f, "accuracy_authorization", None),
            location: failing_query(f, "location", None),
            heading: failing_query(f, "heading", None),
            location_services_enabled: failing_query(f, "location_services_enabled", false),
            maximum_region_monitoring_distance: failing_query(
                f,
                "maximum_region_monitoring_distance",
                0.0,
            ),
            monitored_regions: failing_query(f, "monitored_regions", Vec::new()),
            ranged_beacon_constraints: failing_query(f, "ranged_beacon_constraints", Vec::new()),
            heading_available: failing_query(f, "heading_available", false),
            ranging_available: failing_query(f, "ranging_available", false),
            significant_location_change_monitoring_available: failing_query(
                f,
                "significant_location_change_monitoring_available",
                false,
            ),
            region_monitoring_available: failing_query(f, "region_monitoring_available", false),
            request_always_authorization: failing_command(f, "request_always_authorization"),
            request_when_in_use_authorization: failing_command(
                f,
                "request_when_in_use_authorization",
            ),
            request_location: failing_command(f, "request_location"),
            start_updating_location: failing_command(f, "start_updating_location"),
            stop_updating_location: failing_command(f, "stop_updating_location"),
            start_updating_heading: failing_command(f, "start_updating_heading"),
            stop_updating_heading: failing_command(f, "stop_updating_heading"),
            start_monitoring_significant_location_changes: failing_command(
                f,
                "start_monitoring_significant_location_changes",
            ),
            stop_monitoring_significant_location_changes: failing_command(
                f,
                "stop_monitoring_significant_location_changes",
            ),
            start_monitoring_visits: failing_command(f, "start_monitoring_visits"),
            stop_monitoring_visits: failing_command(f, "stop_monitoring_visits"),
            start_monitoring: failing_command_with(f, "start_monitoring"),
            stop_monitoring: failing_command_with(f, "stop_monitoring"),
            request_state: failing_command_with(f, "request_state"),
            start_ranging_beacons: failing_command_with(f, "start_ranging_beacons"),
            stop_ranging_beacons: failing_command_with(f, "stop_ranging_beacons"),
            dismiss_heading_calibration_display: failing_command(
                f,
                "dismiss_heading_calibration_display",
            ),
            set: failing_command_with(f, "set"),
            request_temporary_full_accuracy_authorization: {
                let failures = f.clone();
                Arc::new(move |_: String| -> BoxFuture<Result<(), LocationError>> {
                    failures.record("request_temporary_full_accuracy_authorization");
                    Box::pin(async { Ok(()) })
                })
            },
            delegate: {
                let failures = f.clone();
                Arc::new(move || {
                    failures.record("delegate");
                    ActionStream::empty()
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locport_domain::location::{Coordinate, Location};
    use locport_domain::properties::Properties;
    use locport_domain::region::Region;
    use locport_domain::time::Timestamp;

    #[tokio::test]
    async fn should_answer_inert_values_from_mock() {
        let manager = LocationManager::mock();

        assert_eq!(
            manager.authorization_status(),
            AuthorizationStatus::NotDetermined
        );
        assert_eq!(manager.location(), None);
        assert!(manager.monitored_regions().is_empty());
        assert!(!manager.heading_available());
        manager.start_updating_location();
        manager.set(Properties::default().with_distance_filter(1.0));
        assert_eq!(
            manager
                .request_temporary_full_accuracy_authorization("Purpose")
                .await,
            Ok(())
        );
        assert!(manager.delegate().recv().await.is_none());
    }

    #[test]
    fn should_let_tests_override_single_mock_operation() {
        let fix = Location::new(Coordinate::new(10.0, 20.0), Timestamp::default());
        let mut manager = LocationManager::mock();
        manager.location = {
            let fix = fix.clone();
            Arc::new(move || Some(fix.clone()))
        };

        assert_eq!(manager.location(), Some(fix));
        assert_eq!(manager.heading(), None);
    }

    #[test]
    fn should_record_failure_and_return_inert_value_when_not_overridden() {
        let failures = TestFailures::new();
        let manager = LocationManager::failing(&failures);

        assert!(!manager.location_services_enabled());
        manager.start_monitoring(Region::circular("home", Coordinate::new(0.0, 0.0), 50.0));

        assert_eq!(
            failures.take(),
            vec![
                "LocationManager.location_services_enabled is unimplemented".to_owned(),
                "LocationManager.start_monitoring is unimplemented".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn should_record_failure_for_one_shot_and_delegate() {
        let failures = TestFailures::new();
        let manager = LocationManager::failing(&failures);

        let result = manager
            .request_temporary_full_accuracy_authorization("Purpose")
            .await;
        let mut stream = manager.delegate();

        assert_eq!(result, Ok(()));
        assert!(stream.recv().await.is_none());
        assert_eq!(failures.take().len(), 2);
    }

    #[test]
    fn should_not_record_overridden_operations() {
        let failures = TestFailures::new();
        let mut manager = LocationManager::failing(&failures);
        manager.authorization_status = Arc::new(|| AuthorizationStatus::AuthorizedWhenInUse);
        manager.request_when_in_use_authorization = Arc::new(|| {});

        manager.request_when_in_use_authorization();
        assert!(manager.authorization_status().is_authorized());

        failures.assert_none();
    }

    #[test]
    #[should_panic(expected = "unchecked location operations")]
    fn should_panic_when_failures_are_dropped_unchecked() {
        let failures = TestFailures::new();
        let manager = LocationManager::failing(&failures);
        manager.stop_updating_location();
        drop(manager);
        drop(failures);
    }

    #[test]
    fn should_not_panic_on_drop_once_failures_are_taken() {
        let failures = TestFailures::new();
        LocationManager::failing(&failures).request_location();
        assert_eq!(failures.take().len(), 1);
        drop(failures);
    }

    #[test]
    #[should_panic(expected = "LocationManager.request_location is unimplemented")]
    fn should_panic_when_asserting_with_recorded_failures() {
        let failures = TestFailures::new();
        LocationManager::failing(&failures).request_location();
        failures.assert_none();
    }
}
