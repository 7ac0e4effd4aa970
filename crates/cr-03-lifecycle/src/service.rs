//! # Lifecycle Service
//!
//! Composes the record store, the action tracker and the backend port.
//!
//! ## Two-phase mutations
//!
//! 1. Call the backend.
//! 2. On success apply a local projection (where one exists) and re-fetch.
//!
//! The projection keeps the list steady while the re-fetch is in flight; the
//! re-fetch replaces it wholesale. A failed re-fetch does not fail the
//! operation, because the backend has already acted.

use crate::domain::{
    DeliveryReceipt, EmailRequest, GenerationOutcome, ImportOutcome, LifecycleConfig,
    PendingRemoval, QueueOutcome, RefreshScope,
};
use crate::error::LifecycleError;
use crate::ports::inbound::LifecycleApi;
use crate::ports::outbound::RegistryGateway;
use async_trait::async_trait;
use cr_01_record_store::{RecordStore, ReplaceReport};
use cr_02_action_tracker::ActionTracker;
use parking_lot::RwLock;
use shared_bus::{DeskEvent, EventPublisher};
use shared_types::{
    ActionKind, AggregateStatistics, CertificateStatus, DeliveryMode, RecordId, SessionView,
    StudentRecord, Upload,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "cr-03";

/// Certificate lifecycle controller.
///
/// Cheap to share behind `Arc`; all state lives in the store and tracker.
pub struct LifecycleController<G, P>
where
    G: RegistryGateway,
    P: EventPublisher,
{
    gateway: Arc<G>,
    publisher: Arc<P>,
    store: Arc<RecordStore>,
    tracker: Arc<ActionTracker>,
    session: Arc<dyn SessionView>,
    config: LifecycleConfig,
    scope: RwLock<RefreshScope>,
}

impl<G, P> LifecycleController<G, P>
where
    G: RegistryGateway + 'static,
    P: EventPublisher + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        publisher: Arc<P>,
        store: Arc<RecordStore>,
        tracker: Arc<ActionTracker>,
        session: Arc<dyn SessionView>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            scope: RwLock::new(config.scope),
            gateway,
            publisher,
            store,
            tracker,
            session,
            config,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn tracker(&self) -> &Arc<ActionTracker> {
        &self.tracker
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    // =========================================================================
    // PRECONDITIONS
    // =========================================================================

    fn ensure_session(&self) -> Result<(), LifecycleError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(LifecycleError::Unauthenticated)
        }
    }

    fn expect_status(
        &self,
        id: RecordId,
        expected: CertificateStatus,
    ) -> Result<StudentRecord, LifecycleError> {
        let record = self
            .store
            .get_by_id(id)
            .ok_or(LifecycleError::UnknownRecord(id))?;
        if record.status != expected {
            return Err(LifecycleError::WrongState {
                id,
                expected,
                actual: record.status,
            });
        }
        Ok(record)
    }

    // =========================================================================
    // SETTLEMENT
    // =========================================================================

    /// Publish a failure notice and hand the error back.
    async fn report(&self, operation: &str, err: LifecycleError) -> LifecycleError {
        let failure = err.to_failure();
        match &err {
            LifecycleError::InFlight(_) => {
                debug!(operation, error = %err, "Duplicate trigger ignored");
            }
            LifecycleError::Backend { .. } => {
                warn!(operation, record_id = ?failure.record, error = %err, "Backend failure");
            }
            _ => {
                warn!(operation, record_id = ?failure.record, kind = %failure.kind, error = %err, "Operation failed");
            }
        }
        self.publisher
            .publish(DeskEvent::OperationFailed {
                source: COMPONENT.to_string(),
                failure,
            })
            .await;
        err
    }

    async fn settle<T>(
        &self,
        operation: &str,
        result: Result<T, LifecycleError>,
    ) -> Result<T, LifecycleError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => Err(self.report(operation, err).await),
        }
    }

    /// Re-fetch after a server-side success. Never fails the caller.
    async fn refresh_after_mutation(&self) -> bool {
        if !self.config.refresh_after_mutation {
            return false;
        }
        match self.fetch_into_store().await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "Refresh after mutation failed; local view may be stale");
                false
            }
        }
    }

    async fn fetch_into_store(&self) -> Result<ReplaceReport, LifecycleError> {
        let scope = *self.scope.read();
        let records = match scope {
            RefreshScope::All => self.gateway.list_records().await,
            RefreshScope::Status(status) => self.gateway.list_by_status(status).await,
        }
        .map_err(|e| LifecycleError::from_gateway(e, None))?;

        let report = self.store.replace_all(records);
        if !report.is_clean() {
            warn!(
                rejected = report.rejected.len(),
                duplicates = report.duplicates,
                "Backend returned inconsistent records"
            );
        }
        debug!(scope = ?scope, accepted = report.accepted, "Records refreshed");
        Ok(report)
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    async fn try_queue(&self, id: RecordId) -> Result<QueueOutcome, LifecycleError> {
        self.ensure_session()?;
        let record = self.expect_status(id, CertificateStatus::Pending)?;

        self.gateway
            .set_status(id, CertificateStatus::Queued)
            .await
            .map_err(|e| LifecycleError::from_gateway(e, Some(id)))?;

        // A concurrent refresh may already have moved or dropped the record.
        if let Err(e) = self.store.update_status(id, CertificateStatus::Queued) {
            debug!(record_id = %id, error = %e, "Skipped local projection");
        }

        info!(record_id = %id, student_id = %record.student_id, "Record queued for generation");
        self.publisher
            .publish(DeskEvent::RecordQueued {
                record: id,
                student_id: record.student_id,
            })
            .await;

        Ok(QueueOutcome {
            record: id,
            refreshed: self.refresh_after_mutation().await,
        })
    }

    async fn try_generate(&self, id: RecordId) -> Result<GenerationOutcome, LifecycleError> {
        self.ensure_session()?;
        self.expect_status(id, CertificateStatus::Queued)?;
        let guard = self.tracker.begin(id, ActionKind::Generate)?;

        let result = self.gateway.generate(id).await;
        if !guard.is_current() {
            warn!(record_id = %id, "Generation settled after its token was force-released");
        }
        guard.finish();

        let receipt = result.map_err(|e| LifecycleError::from_gateway(e, Some(id)))?;
        if !receipt.success {
            return Err(LifecycleError::Backend {
                record: Some(id),
                status: None,
                message: receipt
                    .message
                    .unwrap_or_else(|| "Certificate generation failed".to_string()),
            });
        }

        info!(
            record_id = %id,
            certificate_id = ?receipt.certificate_id,
            transaction_id = ?receipt.transaction_id,
            "Certificate generated"
        );
        self.publisher
            .publish(DeskEvent::CertificateGenerated {
                record: id,
                certificate_id: receipt.certificate_id.clone(),
                transaction_id: receipt.transaction_id.clone(),
            })
            .await;

        Ok(GenerationOutcome {
            record: id,
            certificate_id: receipt.certificate_id,
            transaction_id: receipt.transaction_id,
            message: receipt.message,
            refreshed: self.refresh_after_mutation().await,
        })
    }

    async fn try_deliver(
        &self,
        id: RecordId,
        mode: DeliveryMode,
    ) -> Result<DeliveryReceipt, LifecycleError> {
        self.ensure_session()?;
        let record = self.expect_status(id, CertificateStatus::Issued)?;
        let certificate_id = record
            .certificate_id()
            .map(str::to_string)
            .ok_or(LifecycleError::MissingCertificate(id))?;
        let email = match mode {
            DeliveryMode::Email => Some(
                record
                    .delivery_email()
                    .map(str::to_string)
                    .ok_or(LifecycleError::MissingEmail(id))?,
            ),
            DeliveryMode::Download => None,
        };

        // The token is held through the grace period, so the watchdog must
        // not lapse before the removal runs.
        let hold = self.tracker.config().watchdog_timeout + self.config.delivery_grace;
        let guard = self
            .tracker
            .begin_with_timeout(id, mode.action_kind(), hold)?;

        let delivered = match email {
            None => self.gateway.download(&certificate_id).await.map(Some),
            Some(email) => {
                let request = EmailRequest {
                    email,
                    student_name: record.student_name.clone(),
                    degree_name: record.degree_name.clone(),
                    university_name: record.university_name.clone(),
                };
                self.gateway
                    .email(&certificate_id, &request)
                    .await
                    .map(|()| None)
            }
        };
        let document = match delivered {
            Ok(document) => document,
            Err(e) => {
                guard.finish();
                return Err(LifecycleError::from_gateway(e, Some(id)));
            }
        };

        info!(record_id = %id, certificate_id = %certificate_id, mode = %mode, "Certificate delivered");
        self.publisher
            .publish(DeskEvent::CertificateDelivered {
                record: id,
                certificate_id: certificate_id.clone(),
                mode,
            })
            .await;

        let store = Arc::clone(&self.store);
        let publisher = Arc::clone(&self.publisher);
        let grace = self.config.delivery_grace;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let removed = store.remove(id).is_some();
            if removed {
                publisher.publish(DeskEvent::RecordRemoved { record: id }).await;
            } else {
                debug!(record_id = %id, "Delivered record already gone from local view");
            }
            guard.finish();
            removed
        });

        Ok(DeliveryReceipt {
            record: id,
            certificate_id,
            mode,
            document,
            removal: PendingRemoval::new(id, handle),
        })
    }

    async fn try_import(&self, file: Upload) -> Result<ImportOutcome, LifecycleError> {
        self.ensure_session()?;
        if file.is_empty() {
            return Err(LifecycleError::EmptyImport);
        }

        let file_name = file.file_name.clone();
        let receipt = self
            .gateway
            .import_batch(file)
            .await
            .map_err(LifecycleError::from_import)?;

        info!(file = %file_name, imported = receipt.imported, "Batch imported");
        self.publisher
            .publish(DeskEvent::BatchImported {
                imported: receipt.imported,
                message: receipt.message.clone(),
            })
            .await;

        let refreshed = self.refresh_after_mutation().await;
        if refreshed && self.store.statistics().is_some() {
            if let Err(err) = self.try_refresh_statistics().await {
                debug!(error = %err, "Statistics refresh after import failed");
            }
        }

        Ok(ImportOutcome {
            message: receipt.message,
            imported: receipt.imported,
            refreshed,
        })
    }

    async fn try_refresh(&self) -> Result<ReplaceReport, LifecycleError> {
        self.ensure_session()?;
        self.fetch_into_store().await
    }

    async fn try_refresh_statistics(&self) -> Result<AggregateStatistics, LifecycleError> {
        self.ensure_session()?;
        let statistics = self
            .gateway
            .statistics()
            .await
            .map_err(|e| LifecycleError::from_gateway(e, None))?;
        self.store.set_statistics(statistics.clone());
        debug!(total = statistics.status_counts.total(), "Statistics refreshed");
        Ok(statistics)
    }

    async fn try_list_by_status(
        &self,
        status: CertificateStatus,
    ) -> Result<Vec<StudentRecord>, LifecycleError> {
        self.ensure_session()?;
        self.gateway
            .list_by_status(status)
            .await
            .map_err(|e| LifecycleError::from_gateway(e, None))
    }
}

#[async_trait]
impl<G, P> LifecycleApi for LifecycleController<G, P>
where
    G: RegistryGateway + 'static,
    P: EventPublisher + 'static,
{
    async fn queue_for_generation(&self, id: RecordId) -> Result<QueueOutcome, LifecycleError> {
        let result = self.try_queue(id).await;
        self.settle("queue_for_generation", result).await
    }

    async fn generate_certificate(
        &self,
        id: RecordId,
    ) -> Result<GenerationOutcome, LifecycleError> {
        let result = self.try_generate(id).await;
        self.settle("generate_certificate", result).await
    }

    async fn deliver(
        &self,
        id: RecordId,
        mode: DeliveryMode,
    ) -> Result<DeliveryReceipt, LifecycleError> {
        let result = self.try_deliver(id, mode).await;
        self.settle("deliver", result).await
    }

    async fn import_batch(&self, file: Upload) -> Result<ImportOutcome, LifecycleError> {
        let result = self.try_import(file).await;
        self.settle("import_batch", result).await
    }

    async fn refresh(&self) -> Result<ReplaceReport, LifecycleError> {
        let result = self.try_refresh().await;
        self.settle("refresh", result).await
    }

    async fn refresh_statistics(&self) -> Result<AggregateStatistics, LifecycleError> {
        let result = self.try_refresh_statistics().await;
        self.settle("refresh_statistics", result).await
    }

    async fn list_by_status(
        &self,
        status: CertificateStatus,
    ) -> Result<Vec<StudentRecord>, LifecycleError> {
        let result = self.try_list_by_status(status).await;
        self.settle("list_by_status", result).await
    }

    fn set_refresh_scope(&self, scope: RefreshScope) {
        *self.scope.write() = scope;
    }

    fn refresh_scope(&self) -> RefreshScope {
        *self.scope.read()
    }

    fn records_by_status(&self, status: CertificateStatus) -> Vec<StudentRecord> {
        self.store.filter_by_status(status)
    }
}
