//! # Error Types
//!
//! The uniform failure value shown to operators, its machine-readable kind,
//! and the error returned by every backend port.

use crate::entities::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network or connectivity problem. The server did not act; safe to retry.
    TransportFailure,
    /// Backend state precondition not met. Refresh before retrying.
    TransitionRejected,
    /// Input conflicts with existing data (e.g. duplicate student ids).
    ValidationConflict,
    /// Certificate is not authentic. A normal result, not an error channel.
    VerificationNegative,
    /// Local concurrency guard rejection. Never retried automatically.
    ActionAlreadyInFlight,
    /// No authenticated session.
    Unauthenticated,
    /// Backend failed or answered with something unusable.
    BackendFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransportFailure => "transport_failure",
            Self::TransitionRejected => "transition_rejected",
            Self::ValidationConflict => "validation_conflict",
            Self::VerificationNegative => "verification_negative",
            Self::ActionAlreadyInFlight => "action_already_in_flight",
            Self::Unauthenticated => "unauthenticated",
            Self::BackendFailure => "backend_failure",
        }
    }

    /// Whether an operator may retry the same operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportFailure)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displayable failure scoped to one operation (and possibly one record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordId>,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            record: None,
        }
    }

    /// Attach the record this failure is isolated to.
    pub fn for_record(mut self, record: RecordId) -> Self {
        self.record = Some(record);
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(id) => write!(f, "[{}] record {}: {}", self.kind, id, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Error returned by every backend port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Request never produced an HTTP response.
    #[error("Connection failed: {0}")]
    Transport(String),

    /// 401.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// 403.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success status.
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response arrived but its body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GatewayError {
    /// Build an error from a non-success status and its (possibly empty) body.
    ///
    /// The message comes from the JSON `error` field, then `message`, then
    /// degrades to `Request failed with status N`.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let message = Self::extract_message(body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Rejected { status, message },
        }
    }

    fn extract_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .error
            .into_iter()
            .chain(parsed.message)
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }

    /// The detail text without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Decode(m) => m,
            Self::Rejected { message, .. } => message,
        }
    }

    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) | Self::Decode(_) => None,
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Rejected { status, .. } => Some(*status),
        }
    }

    /// Kind used when the caller has no more specific interpretation.
    pub fn default_kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::Unauthorized(_) | Self::Forbidden(_) => ErrorKind::Unauthenticated,
            Self::NotFound(_) | Self::Conflict(_) => ErrorKind::TransitionRejected,
            Self::Rejected { .. } | Self::Decode(_) => ErrorKind::BackendFailure,
        }
    }

    pub fn to_failure(&self) -> Failure {
        Failure::new(self.default_kind(), self.to_string())
    }
}
