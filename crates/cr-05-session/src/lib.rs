//! # CR-05 Session
//!
//! Explicit session context replacing any ambient global. Components that
//! need the identity receive it as `Arc<dyn SessionView>`.
//!
//! ## Lifecycle
//!
//! ```text
//!            initialize()                        logout() / failed check
//! [cached] ───────────────→ check /users/current ───────────────────────→ [none]
//!                                 │ ok
//!                                 ▼
//!                          [authenticated] ←── login()
//! ```
//!
//! - `initialize` reconciles the locally cached identity with the backend.
//!   A failed freshness check tears the session down and clears the cache.
//! - `logout` always clears local state, even if the backend call fails.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cache;
pub mod error;
pub mod ports;
pub mod service;

pub use cache::{FileIdentityCache, IdentityCache, MemoryIdentityCache};
pub use error::SessionError;
pub use ports::AuthGateway;
pub use service::SessionContext;
