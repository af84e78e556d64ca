//! Authorization states granted to the application.

use serde::{Deserialize, Serialize};

/// Whether and when the application may use location services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    #[default]
    NotDetermined,
    /// Access is restricted by policy; the user cannot change it.
    Restricted,
    Denied,
    AuthorizedAlways,
    AuthorizedWhenInUse,
}

impl AuthorizationStatus {
    /// Whether location updates may be delivered.
    #[must_use]
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedAlways | Self::AuthorizedWhenInUse)
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotDetermined => f.write_str("not_determined"),
            Self::Restricted => f.write_str("restricted"),
            Self::Denied => f.write_str("denied"),
            Self::AuthorizedAlways => f.write_str("authorized_always"),
            Self::AuthorizedWhenInUse => f.write_str("authorized_when_in_use"),
        }
    }
}

/// Precision level granted alongside an authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyAuthorization {
    FullAccuracy,
    ReducedAccuracy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_not_determined() {
        assert_eq!(
            AuthorizationStatus::default(),
            AuthorizationStatus::NotDetermined
        );
    }

    #[test]
    fn should_report_authorized_only_for_granted_states() {
        assert!(AuthorizationStatus::AuthorizedAlways.is_authorized());
        assert!(AuthorizationStatus::AuthorizedWhenInUse.is_authorized());
        assert!(!AuthorizationStatus::Denied.is_authorized());
        assert!(!AuthorizationStatus::NotDetermined.is_authorized());
    }

    #[test]
    fn should_deserialize_snake_case_status() {
        let parsed: AuthorizationStatus =
            serde_json::from_str("\"authorized_when_in_use\"").unwrap();
        assert_eq!(parsed, AuthorizationStatus::AuthorizedWhenInUse);
        assert_eq!(parsed.to_string(), "authorized_when_in_use");
    }
}
