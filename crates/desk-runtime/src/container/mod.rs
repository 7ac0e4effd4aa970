//! # Desk Container
//!
//! Holds every component instance behind `Arc`s so shells can share them
//! across tasks.

pub mod config;
pub mod desk;

pub use config::{ConfigError, DeskConfig};
pub use desk::{Desk, DeskError, DeskLifecycle, DeskSession, DeskVerification};
