//! # Delivery Flows
//!
//! Download and email of ISSUED certificates: per-record mutual exclusion,
//! removal after the grace period, and clean failure.

#[cfg(test)]
mod tests {
    use crate::support::{record_json, Backend};
    use cr_03_lifecycle::{LifecycleApi, LifecycleError};
    use serde_json::json;
    use shared_types::{ActionKind, CertificateStatus, DeliveryMode, ErrorKind, RecordId};
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn concurrent_downloads_issue_one_request() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(5, "ISSUED")]), None)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/certificates/download/CERT-5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.4 certificate".to_vec())
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&backend.server)
            .await;

        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();

        let (first, second) = tokio::join!(
            lifecycle.deliver(RecordId(5), DeliveryMode::Download),
            lifecycle.deliver(RecordId(5), DeliveryMode::Download),
        );
        let (receipt, rejected) = match (first, second) {
            (Ok(receipt), Err(err)) | (Err(err), Ok(receipt)) => (receipt, err),
            other => panic!("expected exactly one winner, got {other:?}"),
        };
        assert_eq!(rejected.kind(), ErrorKind::ActionAlreadyInFlight);
        assert!(matches!(rejected, LifecycleError::InFlight(_)));

        let document = receipt.document.as_ref().unwrap();
        assert_eq!(document.file_name, "CERT-5.pdf");
        assert_eq!(document.bytes, b"%PDF-1.4 certificate");

        // Still held during the grace period.
        assert!(desk.tracker().is_in_flight(RecordId(5), ActionKind::Download));
        assert!(receipt.removal.wait().await);
        assert!(desk.store().get_by_id(RecordId(5)).is_none());
        assert!(!desk.tracker().is_busy(RecordId(5)));
        assert_eq!(
            backend.hits("GET", "/api/certificates/download/CERT-5").await,
            1
        );
    }

    #[tokio::test]
    async fn failed_download_leaves_record_and_releases_token() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(6, "ISSUED")]), None)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/certificates/download/CERT-6"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "Storage offline" })),
            )
            .mount(&backend.server)
            .await;

        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();
        let err = lifecycle
            .deliver(RecordId(6), DeliveryMode::Download)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendFailure);
        assert!(err.to_string().contains("Storage offline"));

        let record = desk.store().get_by_id(RecordId(6)).unwrap();
        assert_eq!(record.status, CertificateStatus::Issued);
        assert!(!desk.tracker().is_busy(RecordId(6)));
    }

    #[tokio::test]
    async fn email_delivery_sends_record_fields_then_removes() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(7, "ISSUED"), record_json(8, "PENDING")]), None)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/certificates/email/CERT-7"))
            .and(body_json(json!({
                "email": "student7@example.edu",
                "studentName": "Student 7",
                "degreeName": "BSc Mathematics",
                "universityName": "Analytical University"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Certificate successfully sent to student7@example.edu"
            })))
            .expect(1)
            .mount(&backend.server)
            .await;

        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();
        let receipt = lifecycle
            .deliver(RecordId(7), DeliveryMode::Email)
            .await
            .unwrap();
        assert!(receipt.document.is_none());
        assert!(receipt.removal.wait().await);

        let remaining: Vec<_> = desk.store().get().into_iter().map(|r| r.id).collect();
        assert_eq!(remaining, vec![RecordId(8)]);
    }

    #[tokio::test]
    async fn download_and_email_do_not_block_each_other() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(9, "ISSUED")]), None)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/certificates/download/CERT-9"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .mount(&backend.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/certificates/email/CERT-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&backend.server)
            .await;

        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();
        let download = lifecycle
            .deliver(RecordId(9), DeliveryMode::Download)
            .await
            .unwrap();
        // Different action kind, same record: allowed while the download is held.
        let email = lifecycle
            .deliver(RecordId(9), DeliveryMode::Email)
            .await
            .unwrap();

        let (a, b) = tokio::join!(download.removal.wait(), email.removal.wait());
        assert!(a ^ b, "exactly one removal finds the record");
    }
}
