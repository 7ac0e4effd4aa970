//! Verification outcome values.

use serde::{Deserialize, Serialize};
use shared_types::{CertificateDetails, ErrorKind, Failure, VerificationResult};
use std::fmt;

/// Why a verification ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationCause {
    /// Backend confirmed the certificate.
    Authentic,
    /// Backend answered that the certificate is not authentic.
    NotAuthentic,
    /// Input was rejected before contacting the backend.
    InvalidInput,
    /// Backend refused the request.
    BackendRejected,
    /// Backend could not be reached.
    Transport,
    /// Backend answered with something unusable.
    MalformedResponse,
}

impl VerificationCause {
    /// Whether the check itself failed, as opposed to producing a verdict.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::BackendRejected | Self::Transport | Self::MalformedResponse
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentic => "authentic",
            Self::NotAuthentic => "not_authentic",
            Self::InvalidInput => "invalid_input",
            Self::BackendRejected => "backend_rejected",
            Self::Transport => "transport",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for VerificationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One settled verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub result: VerificationResult,
    pub cause: VerificationCause,
    /// Non-empty explanation.
    pub message: String,
}

impl VerificationOutcome {
    pub fn authentic(details: CertificateDetails) -> Self {
        Self {
            result: VerificationResult::authentic(details),
            cause: VerificationCause::Authentic,
            message: "Certificate is authentic".to_string(),
        }
    }

    pub fn not_authentic() -> Self {
        Self::invalid(
            VerificationCause::NotAuthentic,
            "Certificate could not be verified: it was not issued by this registry or has been altered",
        )
    }

    /// `{valid: false}` for any non-authentic cause.
    pub fn invalid(cause: VerificationCause, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            format!("Verification failed ({cause})")
        } else {
            message
        };
        Self {
            result: VerificationResult::invalid(),
            cause,
            message,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.result.valid
    }

    pub fn details(&self) -> Option<&CertificateDetails> {
        self.result.certificate_details.as_ref()
    }

    /// Machine-readable kind for non-authentic outcomes.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self.cause {
            VerificationCause::Authentic => None,
            VerificationCause::NotAuthentic => Some(ErrorKind::VerificationNegative),
            VerificationCause::InvalidInput => Some(ErrorKind::ValidationConflict),
            VerificationCause::Transport => Some(ErrorKind::TransportFailure),
            VerificationCause::BackendRejected | VerificationCause::MalformedResponse => {
                Some(ErrorKind::BackendFailure)
            }
        }
    }

    pub fn to_failure(&self) -> Option<Failure> {
        self.kind().map(|kind| Failure::new(kind, self.message.clone()))
    }
}
