//! # CR-04 Verification Client
//!
//! Checks whether a presented certificate matches an authentic, unaltered,
//! previously issued record.
//!
//! ## Inputs
//!
//! - A QR payload, forwarded verbatim. The client never interprets its
//!   structure, so the encoding scheme can change without a client release.
//! - A PDF upload, for certificates where no QR payload was captured.
//!
//! ## Result policy
//!
//! Both paths return a [`VerificationOutcome`] and never an error. Anything
//! that cannot be proven valid is `{valid: false}`; the outcome's
//! [`VerificationCause`] and message tell an operator whether the
//! certificate was judged not authentic or the check itself failed.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{display_date, display_month_year, VerificationCause, VerificationOutcome};
pub use ports::inbound::VerificationApi;
pub use ports::outbound::VerificationGateway;
pub use service::VerificationClient;
