//! Error types for the lifecycle controller.

use cr_02_action_tracker::AlreadyInFlight;
use shared_types::{CertificateStatus, ErrorKind, Failure, GatewayError, RecordId};
use thiserror::Error;

use crate::domain::{is_conflict_report, parse_import_conflicts};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// No authenticated session.
    #[error("Sign in required")]
    Unauthenticated,

    /// Backend refused the session (expired or revoked).
    #[error("Session rejected by backend: {0}")]
    SessionRejected(String),

    /// Record is not in the local view.
    #[error("Record {0} is not in the current list; refresh and try again")]
    UnknownRecord(RecordId),

    /// Operation attempted from the wrong state.
    #[error("Record {id} is {actual}, expected {expected}")]
    WrongState {
        id: RecordId,
        expected: CertificateStatus,
        actual: CertificateStatus,
    },

    /// ISSUED record without a certificate id.
    #[error("Record {0} has no certificate to deliver")]
    MissingCertificate(RecordId),

    /// Email delivery requested for a record without an address.
    #[error("Record {0} has no email address")]
    MissingEmail(RecordId),

    /// Local concurrency guard refusal.
    #[error(transparent)]
    InFlight(#[from] AlreadyInFlight),

    /// Backend reported a state precondition was not met.
    #[error("Rejected by backend: {reason}")]
    Rejected {
        record: Option<RecordId>,
        reason: String,
    },

    /// Nothing to import.
    #[error("Import file is empty")]
    EmptyImport,

    /// Import rows conflict with existing data.
    #[error("Import rejected: {message}")]
    ImportConflict {
        message: String,
        conflicts: Vec<String>,
    },

    /// Import refused for a reason the operator can fix in the file.
    #[error("Import rejected: {0}")]
    ImportRejected(String),

    /// Backend unreachable.
    #[error("Connection failed: {message}")]
    Transport {
        record: Option<RecordId>,
        message: String,
    },

    /// Backend failed or answered unusably.
    #[error("Backend error: {message}")]
    Backend {
        record: Option<RecordId>,
        status: Option<u16>,
        message: String,
    },
}

impl LifecycleError {
    /// Map a port error for a record-level operation.
    ///
    /// 4xx answers mean the backend did not accept the transition; 5xx and
    /// undecodable answers are backend failures.
    pub fn from_gateway(err: GatewayError, record: Option<RecordId>) -> Self {
        match err {
            GatewayError::Transport(message) => Self::Transport { record, message },
            GatewayError::Unauthorized(m) | GatewayError::Forbidden(m) => Self::SessionRejected(m),
            GatewayError::NotFound(reason) | GatewayError::Conflict(reason) => {
                Self::Rejected { record, reason }
            }
            GatewayError::Rejected { status, message } if (400..500).contains(&status) => {
                Self::Rejected {
                    record,
                    reason: message,
                }
            }
            GatewayError::Rejected { status, message } => Self::Backend {
                record,
                status: Some(status),
                message,
            },
            GatewayError::Decode(message) => Self::Backend {
                record,
                status: None,
                message,
            },
        }
    }

    /// Map a port error from the import endpoint.
    pub fn from_import(err: GatewayError) -> Self {
        match err {
            GatewayError::Conflict(message) => Self::ImportConflict {
                conflicts: parse_import_conflicts(&message),
                message,
            },
            GatewayError::Rejected { message, .. } if is_conflict_report(&message) => {
                Self::ImportConflict {
                    conflicts: parse_import_conflicts(&message),
                    message,
                }
            }
            GatewayError::Rejected { status, message } if (400..500).contains(&status) => {
                Self::ImportRejected(message)
            }
            other => Self::from_gateway(other, None),
        }
    }

    /// Record the failure is isolated to, if any.
    pub fn record(&self) -> Option<RecordId> {
        match self {
            Self::UnknownRecord(id)
            | Self::WrongState { id, .. }
            | Self::MissingCertificate(id)
            | Self::MissingEmail(id) => Some(*id),
            Self::InFlight(e) => Some(e.entity),
            Self::Rejected { record, .. }
            | Self::Transport { record, .. }
            | Self::Backend { record, .. } => *record,
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated | Self::SessionRejected(_) => ErrorKind::Unauthenticated,
            Self::UnknownRecord(_)
            | Self::WrongState { .. }
            | Self::MissingCertificate(_)
            | Self::Rejected { .. } => ErrorKind::TransitionRejected,
            Self::MissingEmail(_)
            | Self::EmptyImport
            | Self::ImportConflict { .. }
            | Self::ImportRejected(_) => ErrorKind::ValidationConflict,
            Self::InFlight(_) => ErrorKind::ActionAlreadyInFlight,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::Backend { .. } => ErrorKind::BackendFailure,
        }
    }

    pub fn to_failure(&self) -> Failure {
        let failure = Failure::new(self.kind(), self.to_string());
        match self.record() {
            Some(id) => failure.for_record(id),
            None => failure,
        }
    }
}
