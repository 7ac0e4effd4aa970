//! Desk configuration.
//!
//! Durations are stored as integer `_ms` / `_secs` fields so the TOML file
//! stays plain; accessors hand out `Duration`s and component configs.

use cr_02_action_tracker::TrackerConfig;
use cr_03_lifecycle::LifecycleConfig;
use cr_06_backend_gateway::GatewayConfig;
use desk_telemetry::TelemetryConfig;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Complete desk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub backend: BackendSection,
    pub tracker: TrackerSection,
    pub lifecycle: LifecycleSection,
    pub session: SessionSection,
    pub telemetry: TelemetryConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Invalid config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("backend.base_url must not be empty")]
    EmptyBaseUrl,

    #[error("tracker.watchdog_timeout_ms must be greater than zero")]
    ZeroWatchdog,

    #[error(
        "tracker.watchdog_timeout_ms ({watchdog_ms}) is shorter than tracker.sweep_interval_ms ({sweep_ms})"
    )]
    WatchdogShorterThanSweep { watchdog_ms: u64, sweep_ms: u64 },
}

/// Backend connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: cr_06_backend_gateway::config::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Action tracker timings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerSection {
    pub watchdog_timeout_ms: u64,
    pub sweep_interval_ms: u64,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            watchdog_timeout_ms: 5_000,
            sweep_interval_ms: 500,
        }
    }
}

/// Lifecycle behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LifecycleSection {
    pub delivery_grace_ms: u64,
    pub refresh_after_mutation: bool,
}

impl Default for LifecycleSection {
    fn default() -> Self {
        Self {
            delivery_grace_ms: 1_500,
            refresh_after_mutation: true,
        }
    }
}

/// Session persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub identity_cache_path: PathBuf,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            identity_cache_path: PathBuf::from(".cr-desk/identity.json"),
        }
    }
}

impl DeskConfig {
    /// Load from an optional TOML file, apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&raw).map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Apply `CR_*` overrides from an arbitrary lookup.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        fn millis(var: &'static str, value: String) -> Result<u64, ConfigError> {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { var, value })
        }

        if let Some(url) = lookup("CR_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(v) = lookup("CR_WATCHDOG_MS") {
            self.tracker.watchdog_timeout_ms = millis("CR_WATCHDOG_MS", v)?;
        }
        if let Some(v) = lookup("CR_DELIVERY_GRACE_MS") {
            self.lifecycle.delivery_grace_ms = millis("CR_DELIVERY_GRACE_MS", v)?;
        }
        if let Some(path) = lookup("CR_IDENTITY_CACHE") {
            self.session.identity_cache_path = PathBuf::from(path);
        }
        self.telemetry = self.telemetry.with_overrides(&lookup);
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.tracker.watchdog_timeout_ms == 0 {
            return Err(ConfigError::ZeroWatchdog);
        }
        if self.tracker.watchdog_timeout_ms < self.tracker.sweep_interval_ms {
            return Err(ConfigError::WatchdogShorterThanSweep {
                watchdog_ms: self.tracker.watchdog_timeout_ms,
                sweep_ms: self.tracker.sweep_interval_ms,
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.connect_timeout_secs)
    }

    pub fn watchdog_timeout(&self) -> Duration {
        Duration::from_millis(self.tracker.watchdog_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        // A zero interval would panic in tokio::time::interval.
        Duration::from_millis(self.tracker.sweep_interval_ms.max(1))
    }

    pub fn delivery_grace(&self) -> Duration {
        Duration::from_millis(self.lifecycle.delivery_grace_ms)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.backend.base_url.trim())
            .with_request_timeout(self.request_timeout())
            .with_connect_timeout(self.connect_timeout())
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_watchdog_timeout(self.watchdog_timeout())
            .with_sweep_interval(self.sweep_interval())
    }

    pub fn lifecycle_config(&self) -> LifecycleConfig {
        LifecycleConfig::default()
            .with_delivery_grace(self.delivery_grace())
            .with_refresh_after_mutation(self.lifecycle.refresh_after_mutation)
    }
}
