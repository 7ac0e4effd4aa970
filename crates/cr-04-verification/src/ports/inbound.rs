//! Inbound Ports (Driving Ports)

use crate::domain::VerificationOutcome;
use async_trait::async_trait;
use shared_types::Upload;

/// Certificate verification API. Infallible by contract.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Verify a decoded QR payload.
    async fn verify_by_qr_payload(&self, payload: &str) -> VerificationOutcome;

    /// Verify an uploaded certificate document.
    async fn verify_by_document(&self, file: Upload) -> VerificationOutcome;
}
