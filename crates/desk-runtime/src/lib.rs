//! # Desk Runtime
//!
//! Configuration loading and dependency wiring for the certificate desk.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (TOML file, then `CR_*` environment overrides)
//! 2. Validate it
//! 3. Build the backend client, bus, store, tracker and session
//! 4. Build the lifecycle controller and verification client on top
//! 5. Spawn the tracker watchdog and the event logger
//!
//! Restoring the cached session is left to the shell, which decides whether
//! it wants a network round-trip at startup.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod wiring;

pub use container::{ConfigError, Desk, DeskConfig, DeskError};
