//! Platform capability table.
//!
//! Which optional capabilities exist is decided once per build target.
//! Adapters consult the table instead of branching on the target
//! themselves: an unavailable query answers its documented sentinel and an
//! unavailable command is a no-op.

/// Distance reported by the maximum-monitoring-distance query when region
/// monitoring does not exist on the target.
pub const UNAVAILABLE_MONITORING_DISTANCE: f64 = f64::MAX;

/// Optional capabilities of the location service on a given target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlatformCapabilities {
    pub heading: bool,
    pub heading_calibration: bool,
    pub ranging: bool,
    pub visits: bool,
    pub significant_location_changes: bool,
    pub region_monitoring: bool,
    pub accuracy_authorization: bool,
    pub temporary_full_accuracy: bool,
    pub background_updates: bool,
    pub background_indicator: bool,
}

impl PlatformCapabilities {
    /// Every capability present.
    pub const ALL: Self = Self {
        heading: true,
        heading_calibration: true,
        ranging: true,
        visits: true,
        significant_location_changes: true,
        region_monitoring: true,
        accuracy_authorization: true,
        temporary_full_accuracy: true,
        background_updates: true,
        background_indicator: true,
    };

    /// Only the mandatory surface (authorization, fixes) present.
    pub const NONE: Self = Self {
        heading: false,
        heading_calibration: false,
        ranging: false,
        visits: false,
        significant_location_changes: false,
        region_monitoring: false,
        accuracy_authorization: false,
        temporary_full_accuracy: false,
        background_updates: false,
        background_indicator: false,
    };

    /// Desktop-class Apple targets: no compass, no beacons, no visits.
    pub const DESKTOP: Self = Self {
        heading: false,
        heading_calibration: false,
        ranging: false,
        visits: false,
        background_indicator: false,
        ..Self::ALL
    };

    /// Wearables: compass and fixes, no region or beacon services.
    pub const WEARABLE: Self = Self {
        ranging: false,
        visits: false,
        significant_location_changes: false,
        region_monitoring: false,
        background_indicator: false,
        heading_calibration: false,
        ..Self::ALL
    };

    /// The table for the current build target.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::DESKTOP
        } else if cfg!(target_os = "watchos") {
            Self::WEARABLE
        } else if cfg!(target_os = "tvos") {
            Self::NONE
        } else {
            Self::ALL
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::current()
    }
}
