//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `locport.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use locport_adapter_virtual::VirtualConfig;
use locport_domain::authorization::AuthorizationStatus;
use locport_domain::location::Coordinate;
use locport_domain::properties::Properties;
use locport_domain::region::Region;

const CONFIG_FILE: &str = "locport.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Virtual hardware state and scripted route.
    pub simulation: VirtualConfig,
    /// What the daemon asks of the location service.
    pub tracking: TrackingConfig,
    /// Attributes applied before updates start.
    pub properties: Properties,
    /// Circular regions monitored for entry and exit.
    pub geofences: Vec<GeofenceConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Which authorization the daemon requests at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationRequest {
    #[default]
    WhenInUse,
    Always,
}

/// Tracking behaviour.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub request: AuthorizationRequest,
    /// Also stream compass headings.
    pub heading: bool,
    /// Purpose key for a temporary full accuracy request, if any.
    pub full_accuracy_purpose: Option<String>,
}

/// One `[[geofences]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GeofenceConfig {
    pub identifier: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in metres.
    pub radius: f64,
}

impl GeofenceConfig {
    #[must_use]
    pub fn region(&self) -> Region {
        Region::circular(
            self.identifier.clone(),
            Coordinate::new(self.latitude, self.longitude),
            self.radius,
        )
    }
}

impl Config {
    /// Load configuration from `locport.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, an
    /// override cannot be parsed, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("LOCPORT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("LOCPORT_AUTHORIZATION") {
            self.simulation.authorization = toml::Value::String(val.clone())
                .try_into::<AuthorizationStatus>()
                .map_err(|_| ConfigError::Override {
                    name: "LOCPORT_AUTHORIZATION",
                    value: val,
                })?;
        }
        if let Some(val) = var("LOCPORT_REPLAY_INTERVAL_MS") {
            self.simulation.replay_interval_ms =
                val.parse().map_err(|_| ConfigError::Override {
                    name: "LOCPORT_REPLAY_INTERVAL_MS",
                    value: val,
                })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.replay_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "replay interval must be non-zero".to_string(),
            ));
        }
        if let Some(index) = self.simulation.route.iter().position(|c| !c.is_valid()) {
            return Err(ConfigError::Validation(format!(
                "route waypoint {index} is out of range"
            )));
        }
        for fence in &self.geofences {
            if !Coordinate::new(fence.latitude, fence.longitude).is_valid() {
                return Err(ConfigError::Validation(format!(
                    "geofence {} center is out of range",
                    fence.identifier
                )));
            }
            if !(fence.radius.is_finite() && fence.radius > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "geofence {} radius must be a positive finite number",
                    fence.identifier
                )));
            }
        }
        Ok(())
    }

    /// Delay between two replayed waypoints.
    #[must_use]
    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.simulation.replay_interval_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "locportd=info,locport=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Environment override with an unusable value.
    #[error("invalid value {value:?} for {name}")]
    Override { name: &'static str, value: String },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
