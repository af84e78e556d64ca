//! # locport-adapter-live
//!
//! Live adapter: implements the capability interface against a real
//! [`LocationHardware`] service.
//!
//! ## How it works
//!
//! - The adapter owns the hardware. Queries read it directly; commands are
//!   pushed onto a serial queue drained by one tokio task, so callers never
//!   block and the hardware sees commands in call order.
//! - The first [`delegate`](LiveLocationManager::delegate) call or the first
//!   command creates the [`DelegateBridge`] and registers it with the
//!   hardware. That is the only registration for the adapter's lifetime.
//! - Optional capabilities follow the [`PlatformCapabilities`] table picked
//!   at construction. Unavailable queries answer their sentinel, unavailable
//!   commands are ignored.
//!
//! ## Dependency rule
//!
//! Depends on `locport-app` (port traits) and `locport-domain` only.

mod error;
mod queue;

use std::sync::{Arc, OnceLock};

use locport_app::manager::BoxFuture;
use locport_app::ports::{LocationDelegate, LocationHardware};
use locport_app::{ActionStream, Completion, DelegateBridge, LocationManager};
use locport_domain::authorization::{AccuracyAuthorization, AuthorizationStatus};
use locport_domain::beacon::BeaconIdentityConstraint;
use locport_domain::error::LocationError;
use locport_domain::heading::Heading;
use locport_domain::location::Location;
use locport_domain::platform::{PlatformCapabilities, UNAVAILABLE_MONITORING_DISTANCE};
use locport_domain::properties::Properties;
use locport_domain::region::Region;

pub use error::LiveError;

use queue::CommandQueue;

/// Capability interface backed by a hardware location service.
pub struct LiveLocationManager<H: LocationHardware + 'static> {
    hardware: Arc<H>,
    capabilities: PlatformCapabilities,
    bridge: OnceLock<Arc<DelegateBridge>>,
    queue: CommandQueue<H>,
}

/// Build a [`LocationManager`] driving `hardware` with the current target's
/// capabilities.
///
/// # Errors
///
/// Returns [`LiveError::NoRuntime`] when called outside a tokio runtime.
pub fn manager<H: LocationHardware + 'static>(hardware: H) -> Result<LocationManager, LiveError> {
    Ok(LiveLocationManager::new(hardware)?.into_manager())
}

impl<H: LocationHardware + 'static> LiveLocationManager<H> {
    /// Create an adapter for the current build target.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError::NoRuntime`] when called outside a tokio runtime.
    pub fn new(hardware: H) -> Result<Self, LiveError> {
        Self::with_capabilities(hardware, PlatformCapabilities::current())
    }

    /// Create an adapter with an explicit capability table.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError::NoRuntime`] when called outside a tokio runtime.
    pub fn with_capabilities(
        hardware: H,
        capabilities: PlatformCapabilities,
    ) -> Result<Self, LiveError> {
        let hardware = Arc::new(hardware);
        let queue = CommandQueue::start(Arc::clone(&hardware))?;
        tracing::debug!(?capabilities, "live location manager created");
        Ok(Self {
            hardware,
            capabilities,
            bridge: OnceLock::new(),
            queue,
        })
    }

    #[must_use]
    pub fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    fn bridge(&self) -> &Arc<DelegateBridge> {
        self.bridge.get_or_init(|| {
            let bridge = DelegateBridge::new();
            let delegate: Arc<dyn LocationDelegate> = bridge.clone();
            self.hardware.set_delegate(Arc::downgrade(&delegate));
            tracing::debug!("location delegate registered");
            bridge
        })
    }

    fn push(&self, command: &'static str, job: impl FnOnce(&H) + Send + 'static) {
        self.bridge();
        self.queue.push(command, job);
    }

    fn push_if(
        &self,
        available: bool,
        command: &'static str,
        job: impl FnOnce(&H) + Send + 'static,
    ) {
        if available {
            self.push(command, job);
        } else {
            tracing::debug!(command, "command unavailable on this platform, ignoring");
        }
    }

    /// Wait until every command issued so far has reached the hardware.
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    // Queries

    #[must_use]
    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.hardware.authorization_status()
    }

    #[must_use]
    pub fn accuracy_authorization(&self) -> Option<AccuracyAuthorization> {
        self.capabilities
            .accuracy_authorization
            .then(|| self.hardware.accuracy_authorization())
    }

    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.hardware.location()
    }

    #[must_use]
    pub fn heading(&self) -> Option<Heading> {
        if self.capabilities.heading {
            self.hardware.heading()
        } else {
            None
        }
    }

    #[must_use]
    pub fn location_services_enabled(&self) -> bool {
        self.hardware.location_services_enabled()
    }

    #[must_use]
    pub fn maximum_region_monitoring_distance(&self) -> f64 {
        if self.capabilities.region_monitoring {
            self.hardware.maximum_region_monitoring_distance()
        } else {
            UNAVAILABLE_MONITORING_DISTANCE
        }
    }

    #[must_use]
    pub fn monitored_regions(&self) -> Vec<Region> {
        if self.capabilities.region_monitoring {
            self.hardware.monitored_regions()
        } else {
            Vec::new()
        }
    }

    #[must_use]
    pub fn ranged_beacon_constraints(&self) -> Vec<BeaconIdentityConstraint> {
        if self.capabilities.ranging {
            self.hardware.ranged_beacon_constraints()
        } else {
            Vec::new()
        }
    }

    #[must_use]
    pub fn heading_available(&self) -> bool {
        self.capabilities.heading && self.hardware.heading_available()
    }

    #[must_use]
    pub fn ranging_available(&self) -> bool {
        self.capabilities.ranging && self.hardware.ranging_available()
    }

    #[must_use]
    pub fn significant_location_change_monitoring_available(&self) -> bool {
        self.capabilities.significant_location_changes
            && self
                .hardware
                .significant_location_change_monitoring_available()
    }

    #[must_use]
    pub fn region_monitoring_available(&self) -> bool {
        self.capabilities.region_monitoring && self.hardware.region_monitoring_available()
    }

    // Commands

    pub fn request_always_authorization(&self) {
        self.push("request_always_authorization", H::request_always_authorization);
    }

    pub fn request_when_in_use_authorization(&self) {
        self.push(
            "request_when_in_use_authorization",
            H::request_when_in_use_authorization,
        );
    }

    pub fn request_location(&self) {
        self.push("request_location", H::request_location);
    }

    pub fn start_updating_location(&self) {
        self.push("start_updating_location", H::start_updating_location);
    }

    pub fn stop_updating_location(&self) {
        self.push("stop_updating_location", H::stop_updating_location);
    }

    pub fn start_updating_heading(&self) {
        self.push_if(
            self.capabilities.heading,
            "start_updating_heading",
            H::start_updating_heading,
        );
    }

    pub fn stop_updating_heading(&self) {
        self.push_if(
            self.capabilities.heading,
            "stop_updating_heading",
            H::stop_updating_heading,
        );
    }

    pub fn start_monitoring_significant_location_changes(&self) {
        self.push_if(
            self.capabilities.significant_location_changes,
            "start_monitoring_significant_location_changes",
            H::start_monitoring_significant_location_changes,
        );
    }

    pub fn stop_monitoring_significant_location_changes(&self) {
        self.push_if(
            self.capabilities.significant_location_changes,
            "stop_monitoring_significant_location_changes",
            H::stop_monitoring_significant_location_changes,
        );
    }

    pub fn start_monitoring_visits(&self) {
        self.push_if(
            self.capabilities.visits,
            "start_monitoring_visits",
            H::start_monitoring_visits,
        );
    }

    pub fn stop_monitoring_visits(&self) {
        self.push_if(
            self.capabilities.visits,
            "stop_monitoring_visits",
            H::stop_monitoring_visits,
        );
    }

    pub fn start_monitoring(&self, region: Region) {
        self.push_if(
            self.capabilities.region_monitoring,
            "start_monitoring",
            move |hw| hw.start_monitoring(region),
        );
    }

    pub fn stop_monitoring(&self, region: Region) {
        self.push_if(
            self.capabilities.region_monitoring,
            "stop_monitoring",
            move |hw| hw.stop_monitoring(region),
        );
    }

    pub fn request_state(&self, region: Region) {
        self.push_if(
            self.capabilities.region_monitoring,
            "request_state",
            move |hw| hw.request_state(region),
        );
    }

    pub fn start_ranging_beacons(&self, constraint: BeaconIdentityConstraint) {
        self.push_if(
            self.capabilities.ranging,
            "start_ranging_beacons",
            move |hw| hw.start_ranging_beacons(constraint),
        );
    }

    pub fn stop_ranging_beacons(&self, constraint: BeaconIdentityConstraint) {
        self.push_if(
            self.capabilities.ranging,
            "stop_ranging_beacons",
            move |hw| hw.stop_ranging_beacons(constraint),
        );
    }

    pub fn dismiss_heading_calibration_display(&self) {
        self.push_if(
            self.capabilities.heading_calibration,
            "dismiss_heading_calibration_display",
            H::dismiss_heading_calibration_display,
        );
    }

    /// Apply every present field of `properties` the platform supports.
    pub fn set(&self, properties: Properties) {
        let caps = self.capabilities;
        self.push("set", move |hw| apply_properties(hw, caps, properties));
    }

    /// Ask for temporary full accuracy and wait for the answer.
    ///
    /// Resolves `Ok(())` right away on targets without accuracy
    /// authorization.
    ///
    /// # Errors
    ///
    /// Returns the failure reported by the hardware, or
    /// [`ErrorCode::CompletionDropped`](locport_domain::error::ErrorCode::CompletionDropped)
    /// when the hardware never answers.
    pub async fn request_temporary_full_accuracy_authorization(
        &self,
        purpose_key: impl Into<String>,
    ) -> Result<(), LocationError> {
        if !self.capabilities.temporary_full_accuracy {
            tracing::debug!("temporary full accuracy unavailable on this platform, granting");
            return Ok(());
        }

        let purpose_key = purpose_key.into();
        let (completion, pending) = Completion::channel();
        self.push("request_temporary_full_accuracy_authorization", move |hw| {
            hw.request_temporary_full_accuracy_authorization(&purpose_key, completion);
        });
        pending.await
    }

    /// Attach a new subscriber to the action stream.
    #[must_use]
    pub fn delegate(&self) -> ActionStream {
        self.bridge().subscribe()
    }

    /// Expose the adapter as a [`LocationManager`] record.
    ///
    /// Every field forwards to the shared adapter; the adapter lives as long
    /// as the record (or any clone of it) does.
    #[must_use]
    pub fn into_manager(self) -> LocationManager {
        Arc::new(self).to_manager()
    }

    /// Like [`into_manager`](Self::into_manager), but the caller keeps a
    /// handle on the adapter, e.g. to [`flush`](Self::flush) on shutdown.
    #[must_use]
    pub fn to_manager(self: &Arc<Self>) -> LocationManager {
        let live = Arc::clone(self);

        macro_rules! forward {
            ($method:ident) => {{
                let live = Arc::clone(&live);
                Arc::new(move || live.$method())
            }};
            ($method:ident, $arg:ty) => {{
                let live = Arc::clone(&live);
                Arc::new(move |arg: $arg| live.$method(arg))
            }};
        }

        LocationManager {
            authorization_status: forward!(authorization_status),
            accuracy_authorization: forward!(accuracy_authorization),
            location: forward!(location),
            heading: forward!(heading),
            location_services_enabled: forward!(location_services_enabled),
            maximum_region_monitoring_distance: forward!(maximum_region_monitoring_distance),
            monitored_regions: forward!(monitored_regions),
            ranged_beacon_constraints: forward!(ranged_beacon_constraints),
            heading_available: forward!(heading_available),
            ranging_available: forward!(ranging_available),
            significant_location_change_monitoring_available: forward!(
                significant_location_change_monitoring_available
            ),
            region_monitoring_available: forward!(region_monitoring_available),
            request_always_authorization: forward!(request_always_authorization),
            request_when_in_use_authorization: forward!(request_when_in_use_authorization),
            request_location: forward!(request_location),
            start_updating_location: forward!(start_updating_location),
            stop_updating_location: forward!(stop_updating_location),
            start_updating_heading: forward!(start_updating_heading),
            stop_updating_heading: forward!(stop_updating_heading),
            start_monitoring_significant_location_changes: forward!(
                start_monitoring_significant_location_changes
            ),
            stop_monitoring_significant_location_changes: forward!(
                stop_monitoring_significant_location_changes
            ),
            start_monitoring_visits: forward!(start_monitoring_visits),
            stop_monitoring_visits: forward!(stop_monitoring_visits),
            start_monitoring: forward!(start_monitoring, Region),
            stop_monitoring: forward!(stop_monitoring, Region),
            request_state: forward!(request_state, Region),
            start_ranging_beacons: forward!(start_ranging_beacons, BeaconIdentityConstraint),
            stop_ranging_beacons: forward!(stop_ranging_beacons, BeaconIdentityConstraint),
            dismiss_heading_calibration_display: forward!(dismiss_heading_calibration_display),
            set: forward!(set, Properties),
            request_temporary_full_accuracy_authorization: {
                let live = Arc::clone(&live);
                Arc::new(
                    move |purpose_key: String| -> BoxFuture<Result<(), LocationError>> {
                        let live = Arc::clone(&live);
                        Box::pin(async move {
                            live.request_temporary_full_accuracy_authorization(purpose_key)
                                .await
                        })
                    },
                )
            },
            delegate: forward!(delegate),
        }
    }
}

fn apply_properties<H: LocationHardware>(
    hw: &H,
    caps: PlatformCapabilities,
    properties: Properties,
) {
    let Properties {
        activity_type,
        allows_background_location_updates,
        desired_accuracy,
        distance_filter,
        heading_filter,
        heading_orientation,
        pauses_location_updates_automatically,
        shows_background_location_indicator,
    } = properties;

    if let Some(value) = activity_type {
        hw.set_activity_type(value);
    }
    if let Some(value) = allows_background_location_updates.filter(|_| caps.background_updates) {
        hw.set_allows_background_location_updates(value);
    }
    if let Some(value) = desired_accuracy {
        hw.set_desired_accuracy(value);
    }
    if let Some(value) = distance_filter {
        hw.set_distance_filter(value);
    }
    if let Some(value) = heading_filter.filter(|_| caps.heading) {
        hw.set_heading_filter(value);
    }
    if let Some(value) = heading_orientation.filter(|_| caps.heading) {
        hw.set_heading_orientation(value);
    }
    if let Some(value) =
        pauses_location_updates_automatically.filter(|_| caps.background_updates)
    {
        hw.set_pauses_location_updates_automatically(value);
    }
    if let Some(value) =
        shows_background_location_indicator.filter(|_| caps.background_indicator)
    {
        hw.set_shows_background_location_indicator(value);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, Weak};
    use std::time::Duration;

    use locport_domain::action::Action;
    use locport_domain::error::ErrorCode;
    use locport_domain::location::Coordinate;
    use locport_domain::properties::{ActivityType, HeadingOrientation};
    use locport_domain::time::Timestamp;
    use tokio_stream::StreamExt as _;

    #[derive(Clone, Copy)]
    enum Answer {
        Grant,
        Deny(ErrorCode),
        Drop,
    }

    #[derive(Clone)]
    struct StubHardware {
        calls: Arc<Mutex<Vec<String>>>,
        registrations: Arc<AtomicUsize>,
        delegate: Arc<Mutex<Option<Weak<dyn LocationDelegate>>>>,
        answer: Answer,
    }

    impl StubHardware {
        fn new() -> Self {
            Self {
                calls: Arc::default(),
                registrations: Arc::default(),
                delegate: Arc::default(),
                answer: Answer::Grant,
            }
        }

        fn answering(answer: Answer) -> Self {
            Self {
                answer,
                ..Self::new()
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn registrations(&self) -> usize {
            self.registrations.load(Ordering::SeqCst)
        }

        fn delegate(&self) -> Option<Arc<dyn LocationDelegate>> {
            self.delegate.lock().unwrap().as_ref()?.upgrade()
        }
    }

    impl LocationHardware for StubHardware {
        fn set_delegate(&self, delegate: Weak<dyn LocationDelegate>) {
            self.registrations.fetch_add(1, Ordering::SeqCst);
            *self.delegate.lock().unwrap() = Some(delegate);
        }

        fn authorization_status(&self) -> AuthorizationStatus {
            AuthorizationStatus::AuthorizedWhenInUse
        }

        fn accuracy_authorization(&self) -> AccuracyAuthorization {
            AccuracyAuthorization::ReducedAccuracy
        }

        fn location(&self) -> Option<Location> {
            None
        }

        fn heading(&self) -> Option<Heading> {
            None
        }

        fn location_services_enabled(&self) -> bool {
            true
        }

        fn maximum_region_monitoring_distance(&self) -> f64 {
            1_000.0
        }

        fn monitored_regions(&self) -> Vec<Region> {
            vec![Region::circular("office", Coordinate::new(1.0, 1.0), 100.0)]
        }

        fn ranged_beacon_constraints(&self) -> Vec<BeaconIdentityConstraint> {
            Vec::new()
        }

        fn heading_available(&self) -> bool {
            true
        }

        fn ranging_available(&self) -> bool {
            true
        }

        fn significant_location_change_monitoring_available(&self) -> bool {
            true
        }

        fn region_monitoring_available(&self) -> bool {
            true
        }

        fn request_always_authorization(&self) {
            self.record("request_always_authorization");
        }

        fn request_when_in_use_authorization(&self) {
            self.record("request_when_in_use_authorization");
        }

        fn request_location(&self) {
            self.record("request_location");
        }

        fn start_updating_location(&self) {
            self.record("start_updating_location");
        }

        fn stop_updating_location(&self) {
            self.record("stop_updating_location");
        }

        fn start_updating_heading(&self) {
            self.record("start_updating_heading");
        }

        fn stop_updating_heading(&self) {
            self.record("stop_updating_heading");
        }

        fn start_monitoring_significant_location_changes(&self) {
            self.record("start_monitoring_significant_location_changes");
        }

        fn stop_monitoring_significant_location_changes(&self) {
            self.record("stop_monitoring_significant_location_changes");
        }

        fn start_monitoring_visits(&self) {
            self.record("start_monitoring_visits");
        }

        fn stop_monitoring_visits(&self) {
            self.record("stop_monitoring_visits");
        }

        fn start_monitoring(&self, region: Region) {
            self.record(format!("start_monitoring({})", region.identifier));
        }

        fn stop_monitoring(&self, region: Region) {
            self.record(format!("stop_monitoring({})", region.identifier));
        }

        fn request_state(&self, region: Region) {
            self.record(format!("request_state({})", region.identifier));
        }

        fn start_ranging_beacons(&self, _constraint: BeaconIdentityConstraint) {
            self.record("start_ranging_beacons");
        }

        fn stop_ranging_beacons(&self, _constraint: BeaconIdentityConstraint) {
            self.record("stop_ranging_beacons");
        }

        fn dismiss_heading_calibration_display(&self) {
            self.record("dismiss_heading_calibration_display");
        }

        fn request_temporary_full_accuracy_authorization(
            &self,
            purpose_key: &str,
            completion: Completion,
        ) {
            self.record(format!("full_accuracy({purpose_key})"));
            match self.answer {
                Answer::Grant => {
                    completion.complete(None);
                }
                Answer::Deny(code) => {
                    completion.complete(Some(LocationError::new(code)));
                }
                Answer::Drop => drop(completion),
            }
        }

        fn set_activity_type(&self, value: ActivityType) {
            self.record(format!("set_activity_type({value:?})"));
        }

        fn set_allows_background_location_updates(&self, value: bool) {
            self.record(format!("set_allows_background_location_updates({value})"));
        }

        fn set_desired_accuracy(&self, value: f64) {
            self.record(format!("set_desired_accuracy({value})"));
        }

        fn set_distance_filter(&self, value: f64) {
            self.record(format!("set_distance_filter({value})"));
        }

        fn set_heading_filter(&self, value: f64) {
            self.record(format!("set_heading_filter({value})"));
        }

        fn set_heading_orientation(&self, value: HeadingOrientation) {
            self.record(format!("set_heading_orientation({value:?})"));
        }

        fn set_pauses_location_updates_automatically(&self, value: bool) {
            self.record(format!("set_pauses_location_updates_automatically({value})"));
        }

        fn set_shows_background_location_indicator(&self, value: bool) {
            self.record(format!("set_shows_background_location_indicator({value})"));
        }
    }

    fn live(hardware: &StubHardware) -> LiveLocationManager<StubHardware> {
        LiveLocationManager::with_capabilities(hardware.clone(), PlatformCapabilities::ALL)
            .unwrap()
    }

    async fn next(stream: &mut ActionStream) -> Option<Action> {
        tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("action should arrive")
    }

    #[test]
    fn should_fail_outside_tokio_runtime() {
        let result = LiveLocationManager::new(StubHardware::new());
        assert!(matches!(result, Err(LiveError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn should_not_register_delegate_before_first_use() {
        let hw = StubHardware::new();
        let manager = live(&hw);

        assert_eq!(
            manager.authorization_status(),
            AuthorizationStatus::AuthorizedWhenInUse
        );
        assert!(manager.location_services_enabled());
        assert_eq!(hw.registrations(), 0);
    }

    #[tokio::test]
    async fn should_register_delegate_once_across_subscriptions_and_commands() {
        let hw = StubHardware::new();
        let manager = live(&hw);

        let _a = manager.delegate();
        let _b = manager.delegate();
        manager.start_updating_location();
        let _c = manager.delegate();
        manager.flush().await;

        assert_eq!(hw.registrations(), 1);
    }

    #[tokio::test]
    async fn should_register_delegate_on_first_command() {
        let hw = StubHardware::new();
        let manager = live(&hw);

        manager.request_location();
        assert_eq!(hw.registrations(), 1);
    }

    #[tokio::test]
    async fn should_deliver_hardware_callbacks_to_every_subscriber() {
        let hw = StubHardware::new();
        let manager = live(&hw);
        let mut first = manager.delegate();
        let mut second = manager.delegate();
        let fix = Location::new(Coordinate::new(48.85, 2.35), Timestamp::default());

        let delegate = hw.delegate().expect("delegate registered");
        delegate.did_change_authorization(AuthorizationStatus::Denied);
        delegate.did_update_locations(vec![fix.clone()]);

        for stream in [&mut first, &mut second] {
            assert_eq!(
                next(stream).await,
                Some(Action::DidChangeAuthorization(AuthorizationStatus::Denied))
            );
            assert_eq!(
                next(stream).await,
                Some(Action::DidUpdateLocations(vec![fix.clone()]))
            );
        }
    }

    #[tokio::test]
    async fn should_forward_commands_in_call_order() {
        let hw = StubHardware::new();
        let manager = live(&hw);
        let region = Region::circular("home", Coordinate::new(0.0, 0.0), 50.0);

        manager.request_when_in_use_authorization();
        manager.start_monitoring(region.clone());
        manager.start_updating_location();
        manager.request_state(region.clone());
        manager.stop_monitoring(region);
        manager.stop_updating_location();
        manager.flush().await;

        assert_eq!(
            hw.calls(),
            vec![
                "request_when_in_use_authorization",
                "start_monitoring(home)",
                "start_updating_location",
                "request_state(home)",
                "stop_monitoring(home)",
                "stop_updating_location",
            ]
        );
    }

    #[tokio::test]
    async fn should_apply_only_present_properties() {
        let hw = StubHardware::new();
        let manager = live(&hw);

        manager.set(Properties::default().with_distance_filter(25.0));
        manager.flush().await;

        assert_eq!(hw.calls(), vec!["set_distance_filter(25)"]);
    }

    #[tokio::test]
    async fn should_apply_every_present_property() {
        let hw = StubHardware::new();
        let manager = live(&hw);

        manager.set(
            Properties::default()
                .with_activity_type(ActivityType::Fitness)
                .with_desired_accuracy(10.0)
                .with_heading_orientation(HeadingOrientation::FaceUp)
                .with_shows_background_location_indicator(true),
        );
        manager.flush().await;

        assert_eq!(
            hw.calls(),
            vec![
                "set_activity_type(Fitness)",
                "set_desired_accuracy(10)",
                "set_heading_orientation(FaceUp)",
                "set_shows_background_location_indicator(true)",
            ]
        );
    }

    #[tokio::test]
    async fn should_skip_properties_unsupported_on_platform() {
        let hw = StubHardware::new();
        let manager =
            LiveLocationManager::with_capabilities(hw.clone(), PlatformCapabilities::DESKTOP)
                .unwrap();

        manager.set(
            Properties::default()
                .with_heading_filter(5.0)
                .with_desired_accuracy(100.0)
                .with_shows_background_location_indicator(false),
        );
        manager.flush().await;

        assert_eq!(hw.calls(), vec!["set_desired_accuracy(100)"]);
    }

    #[tokio::test]
    async fn should_ignore_commands_unavailable_on_platform() {
        let hw = StubHardware::new();
        let manager =
            LiveLocationManager::with_capabilities(hw.clone(), PlatformCapabilities::NONE)
                .unwrap();

        manager.start_updating_heading();
        manager.start_monitoring(Region::circular("home", Coordinate::new(0.0, 0.0), 50.0));
        manager.start_monitoring_visits();
        manager.dismiss_heading_calibration_display();
        manager.start_updating_location();
        manager.flush().await;

        assert_eq!(hw.calls(), vec!["start_updating_location"]);
    }

    #[tokio::test]
    async fn should_answer_sentinels_for_unavailable_queries() {
        let hw = StubHardware::new();
        let manager =
            LiveLocationManager::with_capabilities(hw.clone(), PlatformCapabilities::NONE)
                .unwrap();

        assert_eq!(manager.accuracy_authorization(), None);
        assert_eq!(manager.heading(), None);
        assert!(!manager.heading_available());
        assert!(!manager.ranging_available());
        assert!(!manager.region_monitoring_available());
        assert!(!manager.significant_location_change_monitoring_available());
        assert!(manager.monitored_regions().is_empty());
        assert!(
            (manager.maximum_region_monitoring_distance() - UNAVAILABLE_MONITORING_DISTANCE)
                .abs()
                < f64::EPSILON
        );
    }

    #[tokio::test]
    async fn should_read_available_queries_from_hardware() {
        let hw = StubHardware::new();
        let manager = live(&hw);

        assert_eq!(
            manager.accuracy_authorization(),
            Some(AccuracyAuthorization::ReducedAccuracy)
        );
        assert!(manager.heading_available());
        assert_eq!(manager.monitored_regions().len(), 1);
        assert!((manager.maximum_region_monitoring_distance() - 1_000.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_resolve_full_accuracy_request_when_granted() {
        let hw = StubHardware::answering(Answer::Grant);
        let manager = live(&hw);

        let result = manager
            .request_temporary_full_accuracy_authorization("Navigation")
            .await;

        assert_eq!(result, Ok(()));
        assert_eq!(hw.calls(), vec!["full_accuracy(Navigation)"]);
    }

    #[tokio::test]
    async fn should_surface_full_accuracy_denial() {
        let hw = StubHardware::answering(Answer::Deny(ErrorCode::PromptDeclined));
        let manager = live(&hw);

        let result = manager
            .request_temporary_full_accuracy_authorization("Navigation")
            .await;

        assert_eq!(result, Err(LocationError::new(ErrorCode::PromptDeclined)));
    }

    #[tokio::test]
    async fn should_report_dropped_full_accuracy_completion() {
        let hw = StubHardware::answering(Answer::Drop);
        let manager = live(&hw);

        let result = manager
            .request_temporary_full_accuracy_authorization("Navigation")
            .await;

        assert_eq!(
            result,
            Err(LocationError::new(ErrorCode::CompletionDropped))
        );
    }

    #[tokio::test]
    async fn should_grant_full_accuracy_when_platform_lacks_it() {
        let hw = StubHardware::answering(Answer::Drop);
        let manager =
            LiveLocationManager::with_capabilities(hw.clone(), PlatformCapabilities::NONE)
                .unwrap();

        let result = manager
            .request_temporary_full_accuracy_authorization("Navigation")
            .await;

        assert_eq!(result, Ok(()));
        assert!(hw.calls().is_empty());
    }

    #[tokio::test]
    async fn should_forward_record_operations_to_the_adapter() {
        let hw = StubHardware::new();
        let manager = live(&hw).into_manager();

        manager.start_updating_location();
        manager.set(Properties::default().with_distance_filter(5.0));
        let result = manager
            .request_temporary_full_accuracy_authorization("Purpose")
            .await;

        assert_eq!(result, Ok(()));
        assert_eq!(
            hw.calls(),
            vec![
                "start_updating_location",
                "set_distance_filter(5)",
                "full_accuracy(Purpose)",
            ]
        );
        assert!(manager.region_monitoring_available());
    }

    #[tokio::test]
    async fn should_flush_commands_issued_through_a_shared_manager() {
        let hw = StubHardware::new();
        let live = Arc::new(live(&hw));
        let manager = live.to_manager();

        manager.start_updating_location();
        manager.stop_updating_location();
        drop(manager);
        live.flush().await;

        assert_eq!(
            hw.calls(),
            vec!["start_updating_location", "stop_updating_location"]
        );
    }

    #[tokio::test]
    async fn should_keep_stream_alive_after_manager_dropped() {
        let hw = StubHardware::new();
        let manager = live(&hw).into_manager();
        let mut stream = manager.delegate();
        drop(manager);

        let delegate = hw.delegate().expect("stream keeps the delegate alive");
        delegate.did_pause_location_updates();
        drop(delegate);
        assert_eq!(next(&mut stream).await, Some(Action::DidPauseLocationUpdates));

        drop(stream);
        assert!(hw.delegate().is_none());
    }

    #[tokio::test]
    async fn should_release_delegate_when_nothing_holds_it() {
        let hw = StubHardware::new();
        let manager = live(&hw);
        manager.start_updating_location();
        assert!(hw.delegate().is_some());

        drop(manager);
        assert!(hw.delegate().is_none());
    }
}
