//! # CR-01 Record Store
//!
//! Holds the desk's working copy of student records plus the last statistics
//! snapshot fetched from the backend.
//!
//! ## Guarantees
//!
//! - Read-after-write consistency within one process.
//! - No freshness against the backend. Local status updates are projections
//!   for responsiveness only; callers re-fetch after any server-side effect
//!   and hand the result to [`RecordStore::replace_all`].
//! - No network I/O and no business rules beyond the certificate-field
//!   invariant, which is enforced on every write.
//!
//! ```ignore
//! let store = RecordStore::new();
//! let report = store.replace_all(fetched);
//! store.update_status(id, CertificateStatus::Queued)?;
//! let queued = store.filter_by_status(CertificateStatus::Queued);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{RecordStore, ReplaceReport};
