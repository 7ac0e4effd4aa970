//! Outbound Ports (Driven Ports)

use async_trait::async_trait;
use shared_types::{GatewayError, Upload, VerificationResult};

/// Backend verification endpoints (Driven Port).
#[async_trait]
pub trait VerificationGateway: Send + Sync {
    /// `POST /certificates/verify/qr` with `{qrData}`
    async fn verify_qr(&self, payload: &str) -> Result<VerificationResult, GatewayError>;

    /// `POST /certificates/verify` (multipart `pdf`)
    async fn verify_document(&self, file: Upload) -> Result<VerificationResult, GatewayError>;
}

/// Scripted verification backend for testing.
#[cfg(test)]
pub struct MockVerificationGateway {
    response: parking_lot::Mutex<Result<VerificationResult, GatewayError>>,
    calls: std::sync::atomic::AtomicUsize,
    last_payload: parking_lot::Mutex<Option<String>>,
}

#[cfg(test)]
impl MockVerificationGateway {
    pub fn answering(response: Result<VerificationResult, GatewayError>) -> Self {
        Self {
            response: parking_lot::Mutex::new(response),
            calls: std::sync::atomic::AtomicUsize::new(0),
            last_payload: parking_lot::Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<String> {
        self.last_payload.lock().clone()
    }

    fn answer(&self, payload: String) -> Result<VerificationResult, GatewayError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.last_payload.lock() = Some(payload);
        self.response.lock().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl VerificationGateway for MockVerificationGateway {
    async fn verify_qr(&self, payload: &str) -> Result<VerificationResult, GatewayError> {
        self.answer(payload.to_string())
    }

    async fn verify_document(&self, file: Upload) -> Result<VerificationResult, GatewayError> {
        self.answer(file.file_name)
    }
}
