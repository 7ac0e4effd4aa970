//! Values exchanged with the backend port and returned to shells.

use serde::{Deserialize, Serialize};
use shared_types::{CertificateDocument, DeliveryMode, RecordId};
use tokio::task::JoinHandle;
use tracing::warn;

// =============================================================================
// BACKEND RECEIPTS
// =============================================================================

/// Body of `POST /certificates/generateForStudent/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationReceipt {
    pub success: bool,
    pub certificate_id: Option<String>,
    pub transaction_id: Option<String>,
    pub message: Option<String>,
}

/// Accepted import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReceipt {
    pub message: String,
    /// Number of records the backend reports as created.
    pub imported: usize,
}

/// Body of `POST /certificates/email/{certificateId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email: String,
    pub student_name: String,
    pub degree_name: String,
    pub university_name: String,
}

// =============================================================================
// OPERATION OUTCOMES
// =============================================================================

/// Result of `queue_for_generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOutcome {
    pub record: RecordId,
    /// Whether the follow-up re-fetch succeeded.
    pub refreshed: bool,
}

/// Result of `generate_certificate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub record: RecordId,
    pub certificate_id: Option<String>,
    pub transaction_id: Option<String>,
    pub message: Option<String>,
    pub refreshed: bool,
}

/// Result of `import_batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub message: String,
    pub imported: usize,
    pub refreshed: bool,
}

/// Handle on the scheduled removal of a delivered record.
///
/// Dropping it does not cancel the removal.
#[derive(Debug)]
pub struct PendingRemoval {
    record: RecordId,
    handle: JoinHandle<bool>,
}

impl PendingRemoval {
    pub(crate) fn new(record: RecordId, handle: JoinHandle<bool>) -> Self {
        Self { record, handle }
    }

    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the removal. Returns whether the record was still present.
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(record_id = %self.record, error = %e, "Removal task did not complete");
                false
            }
        }
    }
}

/// Result of a confirmed delivery.
#[derive(Debug)]
pub struct DeliveryReceipt {
    pub record: RecordId,
    pub certificate_id: String,
    pub mode: DeliveryMode,
    /// The document, for downloads.
    pub document: Option<CertificateDocument>,
    pub removal: PendingRemoval,
}
