//! # Lifecycle Flows
//!
//! PENDING → QUEUED → ISSUED through the wired desk, with the backend as the
//! source of truth after every mutation.

#[cfg(test)]
mod tests {
    use crate::support::{record_json, Backend};
    use cr_03_lifecycle::{LifecycleApi, LifecycleError};
    use serde_json::json;
    use shared_bus::{DeskEvent, EventFilter, EventSubscriber, EventTopic};
    use shared_types::{CertificateStatus, ErrorKind, RecordId};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn queue_then_requeue_is_rejected() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(1, "PENDING")]), Some(1))
            .await;
        backend
            .serve_records(json!([record_json(1, "QUEUED")]), None)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/students/1/status"))
            .and(body_json(json!({ "status": "QUEUED" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Status updated successfully" })),
            )
            .expect(1)
            .mount(&backend.server)
            .await;

        let mut notices = desk.bus().subscribe(EventFilter::topics(vec![EventTopic::Lifecycle]));
        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();

        let outcome = lifecycle.queue_for_generation(RecordId(1)).await.unwrap();
        assert!(outcome.refreshed);
        assert_eq!(
            desk.store().get_by_id(RecordId(1)).unwrap().status,
            CertificateStatus::Queued
        );
        assert!(matches!(
            notices.try_recv().unwrap(),
            Some(DeskEvent::RecordQueued { record: RecordId(1), .. })
        ));

        let err = lifecycle.queue_for_generation(RecordId(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransitionRejected);
        assert_eq!(
            desk.store().get_by_id(RecordId(1)).unwrap().status,
            CertificateStatus::Queued
        );
    }

    #[tokio::test]
    async fn backend_conflict_leaves_status_unchanged() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(2, "PENDING")]), None)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/students/2/status"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "error": "Student is no longer PENDING" })),
            )
            .mount(&backend.server)
            .await;

        desk.lifecycle().refresh().await.unwrap();
        let err = desk
            .lifecycle()
            .queue_for_generation(RecordId(2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransitionRejected);
        assert_eq!(err.record(), Some(RecordId(2)));
        assert_eq!(
            desk.store().get_by_id(RecordId(2)).unwrap().status,
            CertificateStatus::Pending
        );
    }

    #[tokio::test]
    async fn generation_issues_certificate_and_keeps_invariants() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(3, "QUEUED"), record_json(4, "PENDING")]), Some(1))
            .await;
        backend
            .serve_records(json!([record_json(3, "ISSUED"), record_json(4, "PENDING")]), None)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/certificates/generateForStudent/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "certificateId": "CERT-3",
                "transactionId": "0x0003",
                "message": "Certificate successfully generated"
            })))
            .expect(1)
            .mount(&backend.server)
            .await;

        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();
        let outcome = lifecycle.generate_certificate(RecordId(3)).await.unwrap();
        assert_eq!(outcome.certificate_id.as_deref(), Some("CERT-3"));

        for record in desk.store().get() {
            assert!(record.check_invariants().is_ok(), "{record:?}");
        }
        let issued = lifecycle.records_by_status(CertificateStatus::Issued);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].certificate_id(), Some("CERT-3"));

        // Not QUEUED any more: rejected locally, no second backend call.
        let err = lifecycle.generate_certificate(RecordId(3)).await.unwrap_err();
        assert!(matches!(err, LifecycleError::WrongState { .. }));
        assert_eq!(
            backend
                .hits("POST", "/api/certificates/generateForStudent/3")
                .await,
            1
        );
    }

    #[tokio::test]
    async fn operations_require_a_session() {
        let backend = Backend::start().await;
        let desk = backend.desk();
        let err = desk.lifecycle().refresh().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert_eq!(backend.hits("GET", "/api/students").await, 0);
    }

    #[tokio::test]
    async fn statistics_snapshot_is_stored_as_reported() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        Mock::given(method("GET"))
            .and(path("/api/students/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCounts": { "pending": 10, "queued": null, "issued": 4 },
                "departmentStats": [
                    { "department": "Analytical University", "pending": 10, "queued": 0, "issued": 4 }
                ]
            })))
            .mount(&backend.server)
            .await;

        let stats = desk.lifecycle().refresh_statistics().await.unwrap();
        assert_eq!(stats.status_counts.total(), 14);
        assert_eq!(desk.store().statistics(), Some(stats));
        // Nothing was fetched into the record view.
        assert!(desk.store().is_empty());
    }
}
