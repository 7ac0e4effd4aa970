//! # Certificate Desk Test Suite
//!
//! End-to-end flows through a fully wired [`desk_runtime::Desk`] talking
//! HTTP to a local `wiremock` backend.
//!
//! ```text
//! tests/src/
//! ├── support.rs          # Mock backend fixtures
//! └── integration/
//!     ├── lifecycle_flows.rs
//!     ├── delivery_flows.rs
//!     ├── import_flows.rs
//!     ├── verification_flows.rs
//!     └── session_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cr-tests
//! cargo test -p cr-tests integration::delivery_flows
//! ```

pub mod integration;
pub mod support;
