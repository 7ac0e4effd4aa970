//! Error types for the record store.

use shared_types::{CertificateStatus, ErrorKind, Failure, RecordId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id in the local view.
    #[error("Record {0} is not in the local view")]
    NotFound(RecordId),

    /// Local projection would skip a step, go backwards, or need
    /// server-assigned certificate fields.
    #[error("Record {id} cannot move from {from} to {to} locally")]
    InvalidProjection {
        id: RecordId,
        from: CertificateStatus,
        to: CertificateStatus,
    },
}

impl StoreError {
    pub fn record(&self) -> RecordId {
        match self {
            Self::NotFound(id) | Self::InvalidProjection { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::TransitionRejected
    }

    pub fn to_failure(&self) -> Failure {
        Failure::new(self.kind(), self.to_string()).for_record(self.record())
    }
}
