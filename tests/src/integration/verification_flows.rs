//! # Verification Flows
//!
//! Public checks by QR payload or uploaded PDF. Every outcome is a verdict;
//! none of these calls return an error.

#[cfg(test)]
mod tests {
    use crate::support::Backend;
    use cr_04_verification::{VerificationApi, VerificationCause};
    use serde_json::json;
    use shared_types::{ErrorKind, SessionView, Upload};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn authentic_certificate_without_session() {
        let backend = Backend::start().await;
        let desk = backend.desk();
        Mock::given(method("POST"))
            .and(path("/api/certificates/verify/qr"))
            .and(body_json(json!({ "qrData": "CERT-11|0x000b|c2ln" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "valid": true,
                "certificateDetails": {
                    "studentName": "Student 11",
                    "degreeName": "BSc Mathematics",
                    "universityName": "Analytical University",
                    "graduationDate": "2025-06-15"
                }
            })))
            .expect(1)
            .mount(&backend.server)
            .await;

        assert!(!desk.session().is_authenticated());
        let outcome = desk
            .verification()
            .verify_by_qr_payload("CERT-11|0x000b|c2ln")
            .await;
        assert!(outcome.is_valid());
        assert_eq!(outcome.cause, VerificationCause::Authentic);
        assert_eq!(outcome.details().unwrap().student_name, "Student 11");
        assert!(outcome.kind().is_none());
    }

    #[tokio::test]
    async fn empty_payload_never_reaches_backend() {
        let backend = Backend::start().await;
        let desk = backend.desk();

        let outcome = desk.verification().verify_by_qr_payload("   ").await;
        assert!(!outcome.is_valid());
        assert_eq!(outcome.cause, VerificationCause::InvalidInput);
        assert!(!outcome.message.is_empty());
        assert_eq!(backend.hits("POST", "/api/certificates/verify/qr").await, 0);
    }

    #[tokio::test]
    async fn backend_rejection_is_reported_as_failure() {
        let backend = Backend::start().await;
        let desk = backend.desk();
        Mock::given(method("POST"))
            .and(path("/api/certificates/verify"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "PDF has no embedded QR" })),
            )
            .mount(&backend.server)
            .await;

        let outcome = desk
            .verification()
            .verify_by_document(Upload::new("scan.pdf", "application/pdf", b"%PDF-1.7".to_vec()))
            .await;
        assert!(!outcome.is_valid());
        assert_eq!(outcome.cause, VerificationCause::BackendRejected);
        assert!(outcome.message.contains("PDF has no embedded QR"));
        assert_eq!(outcome.kind(), Some(ErrorKind::BackendFailure));
    }

    #[tokio::test]
    async fn missing_route_is_reported_as_infrastructure_failure() {
        let backend = Backend::start().await;
        let mut config = backend.config();
        // Base URL without the `/api` prefix: nothing is mounted there.
        config.backend.base_url = backend.server.uri();
        let desk = backend.desk_with(config);

        let outcome = desk
            .verification()
            .verify_by_qr_payload("CERT-1|0xabc")
            .await;
        assert!(!outcome.is_valid());
        assert!(outcome.cause.is_infrastructure());
        assert_eq!(outcome.cause, VerificationCause::BackendRejected);
        assert!(outcome.message.contains("404"));
        assert_eq!(outcome.kind(), Some(ErrorKind::BackendFailure));
        assert_eq!(backend.hits("POST", "/certificates/verify/qr").await, 1);
    }

    #[tokio::test]
    async fn non_pdf_upload_is_refused_locally() {
        let backend = Backend::start().await;
        let desk = backend.desk();

        let outcome = desk
            .verification()
            .verify_by_document(Upload::new("photo.png", "image/png", vec![0x89, 0x50]))
            .await;
        assert_eq!(outcome.cause, VerificationCause::InvalidInput);
        assert_eq!(backend.hits("POST", "/api/certificates/verify").await, 0);
    }
}
