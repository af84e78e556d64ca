//! Properties: partial reconfiguration of the location service.
//!
//! Every field is optional. A present field means "set this attribute";
//! an absent field leaves the service's current value untouched. There is
//! no way to reset an attribute to a default by omission.

use serde::{Deserialize, Serialize};

/// Well-known values for [`Properties::desired_accuracy`], in metres.
pub mod accuracy {
    pub const BEST_FOR_NAVIGATION: f64 = -2.0;
    pub const BEST: f64 = -1.0;
    pub const NEAREST_TEN_METERS: f64 = 10.0;
    pub const HUNDRED_METERS: f64 = 100.0;
    pub const KILOMETER: f64 = 1000.0;
    pub const THREE_KILOMETERS: f64 = 3000.0;
    /// Coarse accuracy granted under reduced accuracy authorization.
    pub const REDUCED: f64 = 3000.0;
}

/// Distance filter value disabling filtering (every movement is reported).
pub const DISTANCE_FILTER_NONE: f64 = -1.0;

/// Heading filter value disabling filtering.
pub const HEADING_FILTER_NONE: f64 = -1.0;

/// Kind of activity the application tracks; lets the service tune power use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    #[default]
    Other,
    AutomotiveNavigation,
    Fitness,
    OtherNavigation,
    Airborne,
}

/// Physical device orientation used as the heading reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingOrientation {
    Unknown,
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// Attributes to apply to the location service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Properties {
    pub activity_type: Option<ActivityType>,
    pub allows_background_location_updates: Option<bool>,
    /// Metres, or one of the [`accuracy`] constants.
    pub desired_accuracy: Option<f64>,
    /// Minimum movement in metres before a new fix is reported.
    pub distance_filter: Option<f64>,
    /// Minimum change in degrees before a new heading is reported.
    pub heading_filter: Option<f64>,
    pub heading_orientation: Option<HeadingOrientation>,
    pub pauses_location_updates_automatically: Option<bool>,
    pub shows_background_location_indicator: Option<bool>,
}

impl Properties {
    #[must_use]
    pub fn with_activity_type(mut self, value: ActivityType) -> Self {
        self.activity_type = Some(value);
        self
    }

    #[must_use]
    pub fn with_allows_background_location_updates(mut self, value: bool) -> Self {
        self.allows_background_location_updates = Some(value);
        self
    }

    #[must_use]
    pub fn with_desired_accuracy(mut self, value: f64) -> Self {
        self.desired_accuracy = Some(value);
        self
    }

    #[must_use]
    pub fn with_distance_filter(mut self, value: f64) -> Self {
        self.distance_filter = Some(value);
        self
    }

    #[must_use]
    pub fn with_heading_filter(mut self, value: f64) -> Self {
        self.heading_filter = Some(value);
        self
    }

    #[must_use]
    pub fn with_heading_orientation(mut self, value: HeadingOrientation) -> Self {
        self.heading_orientation = Some(value);
        self
    }

    #[must_use]
    pub fn with_pauses_location_updates_automatically(mut self, value: bool) -> Self {
        self.pauses_location_updates_automatically = Some(value);
        self
    }

    #[must_use]
    pub fn with_shows_background_location_indicator(mut self, value: bool) -> Self {
        self.shows_background_location_indicator = Some(value);
        self
    }

    /// Whether no attribute is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` on top of `self`: present fields of `other` win,
    /// absent ones keep the value from `self`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            activity_type: other.activity_type.or(self.activity_type),
            allows_background_location_updates: other
                .allows_background_location_updates
                .or(self.allows_background_location_updates),
            desired_accuracy: other.desired_accuracy.or(self.desired_accuracy),
            distance_filter: other.distance_filter.or(self.distance_filter),
            heading_filter: other.heading_filter.or(self.heading_filter),
            heading_orientation: other.heading_orientation.or(self.heading_orientation),
            pauses_location_updates_automatically: other
                .pauses_location_updates_automatically
                .or(self.pauses_location_updates_automatically),
            shows_background_location_indicator: other
                .shows_background_location_indicator
                .or(self.shows_background_location_indicator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_all_absent() {
        let props = Properties::default();
        assert!(props.is_empty());
        assert_eq!(props.desired_accuracy, None);
        assert_eq!(props.activity_type, None);
    }

    #[test]
    fn should_set_only_the_chosen_field() {
        let props = Properties::default().with_distance_filter(25.0);
        assert!(!props.is_empty());
        assert_eq!(props.distance_filter, Some(25.0));
        assert_eq!(props.heading_filter, None);
        assert_eq!(props.allows_background_location_updates, None);
    }

    #[test]
    fn should_merge_present_fields_over_existing_ones() {
        let base = Properties::default()
            .with_desired_accuracy(accuracy::BEST)
            .with_distance_filter(10.0);
        let patch = Properties::default().with_distance_filter(50.0);

        let merged = base.merge(patch);
        assert_eq!(merged.desired_accuracy, Some(accuracy::BEST));
        assert_eq!(merged.distance_filter, Some(50.0));
        assert_eq!(merged.heading_orientation, None);
    }

    #[test]
    fn should_deserialize_partial_properties() {
        let json = r#"{"activity_type":"fitness","pauses_location_updates_automatically":false}"#;
        let props: Properties = serde_json::from_str(json).unwrap();
        assert_eq!(props.activity_type, Some(ActivityType::Fitness));
        assert_eq!(props.pauses_location_updates_automatically, Some(false));
        assert_eq!(props.desired_accuracy, None);
    }
}
