//! # Shared Types Crate
//!
//! Domain entities, identity types and the error taxonomy used across the
//! certificate desk components.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a component
//!   boundary (record, statistics snapshot, verification result) lives here.
//! - **Wire Fidelity**: field names follow the backend's camelCase JSON so
//!   the HTTP adapter never needs a second set of DTOs for records.
//! - **Uniform Failures**: components convert their own errors into
//!   [`Failure`] (display message + [`ErrorKind`]) at their boundary.

pub mod entities;
pub mod errors;
pub mod session;

pub use entities::*;
pub use errors::*;
pub use session::*;
