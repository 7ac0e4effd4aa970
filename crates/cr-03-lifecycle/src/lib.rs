//! # CR-03 Lifecycle Controller
//!
//! Drives each student record through the certificate pipeline:
//!
//! ```text
//! PENDING ──queue_for_generation──→ QUEUED ──generate_certificate──→ ISSUED
//!                                                                     │
//!                                             deliver(download|email) │
//!                                                                     ▼
//!                                                                 [removed]
//! ```
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): outcomes, refresh scope, import conflict parsing
//! - **Ports Layer** (`ports/`):
//!   - `LifecycleApi`: driving port used by shells
//!   - `RegistryGateway`: driven port to the registrar backend
//! - **Service Layer** (`service.rs`): `LifecycleController`
//!
//! ## Rules
//!
//! - No backward edges. An operation from the wrong state fails with
//!   `TransitionRejected` and mutates nothing.
//! - Local updates are projections. Every server-affecting call is followed
//!   by a full re-fetch into the record store.
//! - Generation and delivery are guarded per record by the action tracker.
//!   Generation is never retried automatically.
//! - Delivery is destructive: the record leaves the local view a short grace
//!   period after the backend confirms it.
//! - Failures are scoped to one operation and published on the notice bus.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    parse_import_conflicts, DeliveryReceipt, EmailRequest, GenerationOutcome, GenerationReceipt,
    ImportOutcome, ImportReceipt, LifecycleConfig, PendingRemoval, QueueOutcome, RefreshScope,
};
pub use error::LifecycleError;
pub use ports::inbound::LifecycleApi;
pub use ports::outbound::RegistryGateway;
pub use service::LifecycleController;
