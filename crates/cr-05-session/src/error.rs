//! Error types for session handling.

use shared_types::{ErrorKind, Failure, GatewayError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Login failed: {0}")]
    InvalidCredentials(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("System is already set up")]
    SetupNotRequired,

    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Identity cache error: {0}")]
    Cache(String),
}

impl SessionError {
    pub fn from_gateway(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(m) => Self::Transport(m),
            GatewayError::Unauthorized(m) | GatewayError::Forbidden(m) => {
                Self::InvalidCredentials(m)
            }
            other => Self::Backend(other.message().to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials | Self::InvalidCredentials(_) | Self::NotAuthenticated => {
                ErrorKind::Unauthenticated
            }
            Self::SetupNotRequired => ErrorKind::ValidationConflict,
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::Backend(_) | Self::Cache(_) => ErrorKind::BackendFailure,
        }
    }

    pub fn to_failure(&self) -> Failure {
        Failure::new(self.kind(), self.to_string())
    }
}
