//! # Desk Telemetry
//!
//! Structured logging for every desk component.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use desk_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("logging");
//!     desk_telemetry::log_event!(info, "cr-03", "Desk started", records = 0);
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CR_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `CR_JSON_LOGS` | `false` | One JSON object per line |
//! | `CR_CONSOLE_OUTPUT` | `true` | Emit to stderr at all |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}
