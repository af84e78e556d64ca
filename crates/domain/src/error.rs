//! Location errors reported by the hardware service.
//!
//! A [`LocationError`] carries the failure's classification [`ErrorCode`]
//! and, for region-monitoring and ranging failures, an optional sub-domain
//! code. The underlying cause (if any) is kept for diagnostics but is not
//! part of equality: two errors are equal when their codes match.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Classification code of a service-reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The service could not determine a location right now.
    LocationUnknown,
    /// Access to location services was denied by the user.
    Denied,
    /// A network-backed lookup failed.
    Network,
    /// The heading could not be determined (usually magnetic interference).
    HeadingFailure,
    RegionMonitoringDenied,
    RegionMonitoringFailure,
    RegionMonitoringSetupDelayed,
    RegionMonitoringResponseDelayed,
    DeferredFailed,
    DeferredNotUpdatingLocation,
    DeferredAccuracyTooLow,
    DeferredDistanceFiltered,
    DeferredCanceled,
    RangingUnavailable,
    RangingFailure,
    /// The user declined a temporary full-accuracy prompt.
    PromptDeclined,
    HistoricalLocationError,
    /// A one-shot completion handle was released without being resolved.
    CompletionDropped,
    /// A raw code this crate does not know about.
    Other(i64),
}

impl ErrorCode {
    /// Map a raw numeric code to its classification.
    ///
    /// Unrecognised values degrade to [`ErrorCode::Other`] instead of failing.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            -1 => Self::CompletionDropped,
            0 => Self::LocationUnknown,
            1 => Self::Denied,
            2 => Self::Network,
            3 => Self::HeadingFailure,
            4 => Self::RegionMonitoringDenied,
            5 => Self::RegionMonitoringFailure,
            6 => Self::RegionMonitoringSetupDelayed,
            7 => Self::RegionMonitoringResponseDelayed,
            11 => Self::DeferredFailed,
            12 => Self::DeferredNotUpdatingLocation,
            13 => Self::DeferredAccuracyTooLow,
            14 => Self::DeferredDistanceFiltered,
            15 => Self::DeferredCanceled,
            16 => Self::RangingUnavailable,
            17 => Self::RangingFailure,
            18 => Self::PromptDeclined,
            19 => Self::HistoricalLocationError,
            other => Self::Other(other),
        }
    }

    /// The raw numeric code.
    #[must_use]
    pub fn raw(self) -> i64 {
        match self {
            Self::CompletionDropped => -1,
            Self::LocationUnknown => 0,
            Self::Denied => 1,
            Self::Network => 2,
            Self::HeadingFailure => 3,
            Self::RegionMonitoringDenied => 4,
            Self::RegionMonitoringFailure => 5,
            Self::RegionMonitoringSetupDelayed => 6,
            Self::RegionMonitoringResponseDelayed => 7,
            Self::DeferredFailed => 11,
            Self::DeferredNotUpdatingLocation => 12,
            Self::DeferredAccuracyTooLow => 13,
            Self::DeferredDistanceFiltered => 14,
            Self::DeferredCanceled => 15,
            Self::RangingUnavailable => 16,
            Self::RangingFailure => 17,
            Self::PromptDeclined => 18,
            Self::HistoricalLocationError => 19,
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocationUnknown => f.write_str("location unknown"),
            Self::Denied => f.write_str("location access denied"),
            Self::Network => f.write_str("network error"),
            Self::HeadingFailure => f.write_str("heading unavailable"),
            Self::RegionMonitoringDenied => f.write_str("region monitoring denied"),
            Self::RegionMonitoringFailure => f.write_str("region monitoring failed"),
            Self::RegionMonitoringSetupDelayed => f.write_str("region monitoring setup delayed"),
            Self::RegionMonitoringResponseDelayed => {
                f.write_str("region monitoring response delayed")
            }
            Self::DeferredFailed => f.write_str("deferred updates failed"),
            Self::DeferredNotUpdatingLocation => {
                f.write_str("deferred updates requested while not updating location")
            }
            Self::DeferredAccuracyTooLow => f.write_str("deferred updates accuracy too low"),
            Self::DeferredDistanceFiltered => f.write_str("deferred updates distance filtered"),
            Self::DeferredCanceled => f.write_str("deferred updates canceled"),
            Self::RangingUnavailable => f.write_str("beacon ranging unavailable"),
            Self::RangingFailure => f.write_str("beacon ranging failed"),
            Self::PromptDeclined => f.write_str("accuracy prompt declined"),
            Self::HistoricalLocationError => f.write_str("historical location error"),
            Self::CompletionDropped => f.write_str("completion dropped without a result"),
            Self::Other(raw) => write!(f, "unknown location error code {raw}"),
        }
    }
}

/// A failure reported by the location service.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{code}")]
pub struct LocationError {
    /// Classification code.
    pub code: ErrorCode,
    /// Secondary constraint identifier carried by region-monitoring and
    /// ranging failures.
    pub sub_code: Option<i64>,
    #[serde(skip)]
    #[source]
    cause: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl LocationError {
    /// Create an error with the given classification.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            sub_code: None,
            cause: None,
        }
    }

    /// Attach a sub-domain code.
    #[must_use]
    pub fn with_sub_code(mut self, sub_code: i64) -> Self {
        self.sub_code = Some(sub_code);
        self
    }

    /// Attach the originating failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }
}

impl From<ErrorCode> for LocationError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl PartialEq for LocationError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.sub_code == other.sub_code
    }
}

impl Eq for LocationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, thiserror::Error)]
    #[error("radio off")]
    struct RadioOff;

    #[test]
    fn should_map_known_raw_codes() {
        assert_eq!(ErrorCode::from_raw(1), ErrorCode::Denied);
        assert_eq!(ErrorCode::from_raw(17), ErrorCode::RangingFailure);
        assert_eq!(ErrorCode::RegionMonitoringFailure.raw(), 5);
    }

    #[test]
    fn should_degrade_unknown_raw_code_to_other() {
        assert_eq!(ErrorCode::from_raw(42), ErrorCode::Other(42));
        assert_eq!(ErrorCode::Other(42).raw(), 42);
    }

    #[test]
    fn should_compare_errors_by_code_only() {
        let plain = LocationError::new(ErrorCode::Network);
        let with_cause = LocationError::new(ErrorCode::Network).with_cause(RadioOff);
        assert_eq!(plain, with_cause);
        assert_ne!(plain, LocationError::new(ErrorCode::Denied));
    }

    #[test]
    fn should_include_sub_code_in_equality() {
        let a = LocationError::new(ErrorCode::RangingFailure).with_sub_code(3);
        let b = LocationError::new(ErrorCode::RangingFailure).with_sub_code(4);
        assert_ne!(a, b);
        assert_eq!(a, LocationError::new(ErrorCode::RangingFailure).with_sub_code(3));
    }

    #[test]
    fn should_expose_cause_as_source() {
        let err = LocationError::new(ErrorCode::LocationUnknown).with_cause(RadioOff);
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("radio off"));
        assert!(LocationError::new(ErrorCode::Denied).source().is_none());
    }

    #[test]
    fn should_display_code_description() {
        let err = LocationError::new(ErrorCode::Denied);
        assert_eq!(err.to_string(), "location access denied");
        assert_eq!(
            ErrorCode::Other(99).to_string(),
            "unknown location error code 99"
        );
    }
}
