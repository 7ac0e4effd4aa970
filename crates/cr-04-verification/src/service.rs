//! # Verification Service
//!
//! Pre-checks input, forwards it to the backend and normalizes whatever
//! comes back into a [`VerificationOutcome`].

use crate::domain::{VerificationCause, VerificationOutcome};
use crate::ports::inbound::VerificationApi;
use crate::ports::outbound::VerificationGateway;
use async_trait::async_trait;
use shared_types::{GatewayError, Upload, VerificationResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PDF_CONTENT_TYPE: &str = "application/pdf";

pub struct VerificationClient<G: VerificationGateway> {
    gateway: Arc<G>,
}

impl<G: VerificationGateway> VerificationClient<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    fn interpret(
        &self,
        source: &str,
        response: Result<VerificationResult, GatewayError>,
    ) -> VerificationOutcome {
        let outcome = match response {
            Ok(VerificationResult {
                valid: true,
                certificate_details: Some(details),
            }) => VerificationOutcome::authentic(details),
            Ok(VerificationResult { valid: true, .. }) => VerificationOutcome::invalid(
                VerificationCause::MalformedResponse,
                "Backend reported a valid certificate without its details",
            ),
            Ok(_) => VerificationOutcome::not_authentic(),
            // The verify endpoints answer unknown certificates with valid=false,
            // so a 404 means the route itself is missing.
            Err(GatewayError::NotFound(m)) => VerificationOutcome::invalid(
                VerificationCause::BackendRejected,
                format!("Verification endpoint not found (404): {m}"),
            ),
            Err(GatewayError::Transport(m)) => VerificationOutcome::invalid(
                VerificationCause::Transport,
                format!("Verification service unreachable: {m}"),
            ),
            Err(GatewayError::Decode(m)) => VerificationOutcome::invalid(
                VerificationCause::MalformedResponse,
                format!("Unreadable verification response: {m}"),
            ),
            Err(other) => VerificationOutcome::invalid(
                VerificationCause::BackendRejected,
                format!("Verification request rejected: {}", other.message()),
            ),
        };

        if outcome.cause.is_infrastructure() {
            warn!(source, cause = %outcome.cause, message = %outcome.message, "Verification could not complete");
        } else {
            info!(source, cause = %outcome.cause, valid = outcome.is_valid(), "Verification settled");
        }
        outcome
    }
}

fn is_pdf(file: &Upload) -> bool {
    let base = file
        .content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    if base.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
        return true;
    }
    let generic = base.is_empty() || base.eq_ignore_ascii_case("application/octet-stream");
    generic && file.has_extension(&["pdf"])
}

#[async_trait]
impl<G: VerificationGateway> VerificationApi for VerificationClient<G> {
    async fn verify_by_qr_payload(&self, payload: &str) -> VerificationOutcome {
        if payload.trim().is_empty() {
            debug!("Rejected empty QR payload");
            return VerificationOutcome::invalid(
                VerificationCause::InvalidInput,
                "QR payload is empty; scan the certificate's code again",
            );
        }
        // Forwarded verbatim.
        let response = self.gateway.verify_qr(payload).await;
        self.interpret("qr", response)
    }

    async fn verify_by_document(&self, file: Upload) -> VerificationOutcome {
        if file.is_empty() {
            return VerificationOutcome::invalid(
                VerificationCause::InvalidInput,
                "Uploaded document is empty",
            );
        }
        if !is_pdf(&file) {
            debug!(file = %file.file_name, content_type = %file.content_type, "Rejected non-PDF upload");
            return VerificationOutcome::invalid(
                VerificationCause::InvalidInput,
                "Only PDF certificates can be verified",
            );
        }
        let response = self.gateway.verify_document(file).await;
        self.interpret("document", response)
    }
}
