//! # Shared Bus - Notice Bus for the Certificate Desk
//!
//! Components never talk to the presentation shell directly. They publish a
//! `DeskEvent` for every operation that settles, and whatever shell is
//! attached (CLI, desktop UI, test harness) subscribes to the topics it
//! renders.
//!
//! ```text
//! ┌──────────────┐    publish()     ┌──────────────┐   subscribe()   ┌──────────┐
//! │  Lifecycle   │ ───────────────→ │   Desk Bus   │ ──────────────→ │  Shell   │
//! │  Session     │                  │  (broadcast) │                 │          │
//! └──────────────┘                  └──────────────┘                 └──────────┘
//! ```
//!
//! Publishing never blocks and never fails: a notice with no listener is
//! dropped and counted.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{DeskEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus, NullPublisher};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum notices buffered per subscriber before the oldest are skipped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
