//! # Event Wiring
//!
//! Background consumers of the desk's event bus.

mod event_log;

pub use event_log::{log_desk_event, spawn_event_logger};
