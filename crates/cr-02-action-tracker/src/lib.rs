//! # CR-02 Action Tracker
//!
//! Records which `(record, action)` pairs currently have an operation in
//! flight so a shell can disable duplicate triggers and show per-row
//! "processing" state.
//!
//! ## Invariants
//!
//! - At most one in-flight token per `(RecordId, ActionKind)`. A second
//!   `begin` fails with [`AlreadyInFlight`]; it never queues or overwrites.
//! - Every token is released exactly once: by [`ActionGuard::finish`], by
//!   dropping the guard on any exit path, by an explicit
//!   [`ActionTracker::end`], or by the watchdog.
//! - The watchdog only frees the visible lock. It does not cancel the
//!   request the token was guarding, and a guard whose token was
//!   force-released never releases a newer token for the same pair.
//!
//! ```ignore
//! let tracker = Arc::new(ActionTracker::new(TrackerConfig::default()));
//! let guard = tracker.begin(id, ActionKind::Download)?;
//! gateway.download(cert).await?;   // guard dropped on `?` too
//! guard.finish();
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod error;
pub mod tracker;

pub use config::TrackerConfig;
pub use error::AlreadyInFlight;
pub use tracker::{watchdog_task, ActionGuard, ActionKey, ActionTracker, TrackerStats};
