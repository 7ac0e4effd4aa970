//! # Import Flows
//!
//! Spreadsheet batches: success, rejected rows, and failures that must not
//! disturb the current view.

#[cfg(test)]
mod tests {
    use crate::support::{record_json, spreadsheet, Backend};
    use cr_03_lifecycle::{LifecycleApi, LifecycleError};
    use serde_json::json;
    use shared_bus::{DeskEvent, EventFilter, EventSubscriber, EventTopic};
    use shared_types::{ErrorKind, RecordId, Upload};
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn successful_import_refreshes_view() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(1, "PENDING")]), Some(1))
            .await;
        backend
            .serve_records(
                json!([
                    record_json(1, "PENDING"),
                    record_json(2, "PENDING"),
                    record_json(3, "PENDING")
                ]),
                None,
            )
            .await;
        Mock::given(method("POST"))
            .and(path("/api/students/import"))
            .and(body_string_contains("filename=\"graduates.xlsx\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Successfully imported 2 students",
                "students": [record_json(2, "PENDING"), record_json(3, "PENDING")]
            })))
            .expect(1)
            .mount(&backend.server)
            .await;

        let mut notices = desk.bus().subscribe(EventFilter::topics(vec![EventTopic::Lifecycle]));
        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();
        assert_eq!(desk.store().len(), 1);

        let outcome = lifecycle
            .import_batch(spreadsheet("graduates.xlsx"))
            .await
            .unwrap();
        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.message, "Successfully imported 2 students");
        assert!(outcome.refreshed);
        assert_eq!(desk.store().len(), 3);
        assert!(matches!(
            notices.try_recv().unwrap(),
            Some(DeskEvent::BatchImported { imported: 2, .. })
        ));
    }

    #[tokio::test]
    async fn conflicting_rows_are_reported_per_row() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(1, "PENDING")]), None)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/students/import"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Errors found in Excel import: Row 2: Student ID already exists: S-001; \
                          Row 3: Student ID already exists: S-002"
            })))
            .mount(&backend.server)
            .await;

        let lifecycle = desk.lifecycle();
        lifecycle.refresh().await.unwrap();
        let revision = desk.store().revision();

        let err = lifecycle
            .import_batch(spreadsheet("duplicates.xlsx"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationConflict);
        match err {
            LifecycleError::ImportConflict { conflicts, .. } => assert_eq!(
                conflicts,
                vec![
                    "Row 2: Student ID already exists: S-001".to_string(),
                    "Row 3: Student ID already exists: S-002".to_string(),
                ]
            ),
            other => panic!("expected ImportConflict, got {other:?}"),
        }

        // Existing records untouched; no refresh after a failed import.
        assert_eq!(desk.store().revision(), revision);
        assert!(desk.store().get_by_id(RecordId(1)).is_some());
        assert_eq!(backend.hits("GET", "/api/students").await, 1);
    }

    #[tokio::test]
    async fn slow_backend_is_a_transport_failure() {
        let backend = Backend::start().await;
        let mut config = backend.config();
        config.backend.request_timeout_secs = 1;
        backend.mount_login().await;
        let desk = backend.desk_with(config);
        desk.session()
            .login(&shared_types::LoginCredentials::new(
                crate::support::USERNAME,
                crate::support::PASSWORD,
            ))
            .await
            .unwrap();
        Mock::given(method("POST"))
            .and(path("/api/students/import"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": "late", "students": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&backend.server)
            .await;

        let err = desk
            .lifecycle()
            .import_batch(spreadsheet("slow.xlsx"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(err.kind().is_retryable());
    }

    #[tokio::test]
    async fn empty_upload_is_refused_locally() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;

        let err = desk
            .lifecycle()
            .import_batch(Upload::new("empty.xlsx", "application/octet-stream", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::EmptyImport));
        assert_eq!(backend.hits("POST", "/api/students/import").await, 0);
    }
}
