//! Logging configuration from environment variables.

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Tag attached to the startup line.
    pub service_name: String,

    /// `EnvFilter` directive, e.g. `info` or `cr_03_lifecycle=debug,info`.
    pub log_level: String,

    /// Whether to emit anything to the console.
    pub console_output: bool,

    /// JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "certificate-desk".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Apply `CR_*` overrides from an arbitrary lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("CR_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            self.log_level = level;
        }
        if let Some(v) = lookup("CR_CONSOLE_OUTPUT") {
            self.console_output = !(v.eq_ignore_ascii_case("false") || v == "0");
        }
        if let Some(v) = lookup("CR_JSON_LOGS") {
            self.json_logs = v.eq_ignore_ascii_case("true") || v == "1";
        }
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}
