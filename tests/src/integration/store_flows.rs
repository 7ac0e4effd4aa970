//! # Store Flows
//!
//! What the backend sends versus what the record store keeps, and the
//! action tracker's bookkeeping around a real HTTP round trip.

#[cfg(test)]
mod tests {
    use crate::support::{record_json, Backend};
    use cr_01_record_store::{RecordStore, ReplaceReport};
    use cr_02_action_tracker::ActionTracker;
    use cr_03_lifecycle::{LifecycleApi, RegistryGateway};
    use cr_06_backend_gateway::{BackendClient, GatewayConfig};
    use serde_json::json;
    use shared_types::{ActionKind, CertificateStatus, RecordId};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn assert_consistent(store: &RecordStore) {
        for record in store.get() {
            assert!(record.check_invariants().is_ok(), "{record:?}");
        }
    }

    #[tokio::test]
    async fn inconsistent_backend_rows_never_reach_the_store() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;

        let mut certificate_too_early = record_json(2, "QUEUED");
        certificate_too_early["certificateId"] = json!("CERT-2");
        let mut issued_without_certificate = record_json(3, "ISSUED");
        issued_without_certificate["certificateId"] = json!("   ");
        backend
            .serve_records(
                json!([
                    record_json(1, "PENDING"),
                    certificate_too_early,
                    issued_without_certificate,
                    record_json(4, "ISSUED"),
                    record_json(1, "PENDING")
                ]),
                None,
            )
            .await;

        // The raw gateway hands every row through.
        let client = BackendClient::new(GatewayConfig::new(format!(
            "{}/api",
            backend.server.uri()
        )))
        .unwrap();
        assert_eq!(client.list_records().await.unwrap().len(), 5);

        let report: ReplaceReport = desk.lifecycle().refresh().await.unwrap();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.duplicates, 1);
        assert!(!report.is_clean());

        let store: &RecordStore = desk.store();
        assert_consistent(store);
        let ids: Vec<_> = store.get().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RecordId(1), RecordId(4)]);
        assert_eq!(
            store.get_by_id(RecordId(4)).unwrap().certificate_id(),
            Some("CERT-4")
        );
    }

    #[tokio::test]
    async fn generation_token_is_released_once_the_backend_answers() {
        let backend = Backend::start().await;
        let desk = backend.signed_in_desk().await;
        backend
            .serve_records(json!([record_json(5, "QUEUED")]), Some(1))
            .await;
        backend
            .serve_records(json!([record_json(5, "ISSUED")]), None)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/certificates/generateForStudent/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "certificateId": "CERT-5",
                "transactionId": "0x0005"
            })))
            .mount(&backend.server)
            .await;

        desk.lifecycle().refresh().await.unwrap();
        desk.lifecycle()
            .generate_certificate(RecordId(5))
            .await
            .unwrap();

        let tracker: &ActionTracker = desk.tracker();
        assert!(!tracker.is_in_flight(RecordId(5), ActionKind::Generate));
        assert_eq!(tracker.in_flight_count(), 0);
        assert_eq!(tracker.stats().begun(), 1);
        assert_eq!(tracker.stats().completed(), 1);
        assert_consistent(desk.store());
        assert_eq!(
            desk.store().get_by_id(RecordId(5)).unwrap().status,
            CertificateStatus::Issued
        );
    }
}
