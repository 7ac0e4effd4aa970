//! Inbound Ports (Driving Ports)
//!
//! The API a presentation shell calls.

use crate::domain::{
    DeliveryReceipt, GenerationOutcome, ImportOutcome, QueueOutcome, RefreshScope,
};
use crate::error::LifecycleError;
use async_trait::async_trait;
use cr_01_record_store::ReplaceReport;
use shared_types::{
    AggregateStatistics, CertificateStatus, DeliveryMode, RecordId, StudentRecord, Upload,
};

#[async_trait]
pub trait LifecycleApi: Send + Sync {
    /// PENDING → QUEUED. Not tracker-guarded; the backend decides races.
    async fn queue_for_generation(&self, id: RecordId) -> Result<QueueOutcome, LifecycleError>;

    /// QUEUED → ISSUED. Guarded per record; never retried.
    async fn generate_certificate(&self, id: RecordId)
        -> Result<GenerationOutcome, LifecycleError>;

    /// Deliver an ISSUED certificate, then remove the record after the grace period.
    async fn deliver(
        &self,
        id: RecordId,
        mode: DeliveryMode,
    ) -> Result<DeliveryReceipt, LifecycleError>;

    /// Forward a spreadsheet to the backend.
    async fn import_batch(&self, file: Upload) -> Result<ImportOutcome, LifecycleError>;

    /// Replace the store from the backend using the current scope.
    async fn refresh(&self) -> Result<ReplaceReport, LifecycleError>;

    /// Fetch and store the backend's statistics snapshot.
    async fn refresh_statistics(&self) -> Result<AggregateStatistics, LifecycleError>;

    /// Fetch records in one status without touching the store.
    async fn list_by_status(
        &self,
        status: CertificateStatus,
    ) -> Result<Vec<StudentRecord>, LifecycleError>;

    /// Change which records `refresh` fetches.
    fn set_refresh_scope(&self, scope: RefreshScope);

    fn refresh_scope(&self) -> RefreshScope;

    /// Records of one status from the last fetch.
    fn records_by_status(&self, status: CertificateStatus) -> Vec<StudentRecord>;
}
