//! # Backend Gateway
//!
//! HTTP adapter for the registrar backend. One [`BackendClient`] implements
//! every driven port of the desk:
//!
//! - `RegistryGateway` (cr-03) for records, statistics and certificates
//! - `VerificationGateway` (cr-04) for QR and document verification
//! - `AuthGateway` (cr-05) for sign-in and setup
//!
//! The client keeps a cookie jar, so the backend session established by
//! `login` is carried on every later request.
//!
//! ## Error mapping
//!
//! | Situation | `GatewayError` |
//! |-----------|----------------|
//! | No HTTP response (refused, timeout) | `Transport` |
//! | 401 | `Unauthorized` |
//! | 403 | `Forbidden` |
//! | 404 | `NotFound` |
//! | 409 | `Conflict` |
//! | Other non-2xx | `Rejected { status, message }` |
//! | 2xx with an unreadable body | `Decode` |
//!
//! Messages come from the backend's `{"error": ...}` body when present.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod client;
pub mod config;
pub mod decode;

mod auth;
mod registry;
mod verification;

pub use client::BackendClient;
pub use config::GatewayConfig;
