//! Domain layer for certificate verification.

pub mod dates;
pub mod outcome;

pub use dates::{display_date, display_month_year, UNKNOWN_DATE};
pub use outcome::{VerificationCause, VerificationOutcome};
