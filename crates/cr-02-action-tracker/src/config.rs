//! Tracker configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Watchdog settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// A token older than this is force-released.
    pub watchdog_timeout: Duration,
    /// How often the background watchdog sweeps.
    pub sweep_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            watchdog_timeout: Duration::from_secs(5),
            sweep_interval: Duration::from_millis(500),
        }
    }
}

impl TrackerConfig {
    pub fn with_watchdog_timeout(mut self, timeout: Duration) -> Self {
        self.watchdog_timeout = timeout;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
