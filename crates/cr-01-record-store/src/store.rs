//! # Record Store
//!
//! Thread-safe working copy of the records, guarded by a single
//! `parking_lot::RwLock` so every mutation is atomic with respect to readers.

use crate::error::StoreError;
use parking_lot::RwLock;
use shared_types::{
    AggregateStatistics, CertificateStatus, RecordId, RecordInvariantViolation, StudentRecord,
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Outcome of [`RecordStore::replace_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceReport {
    /// Records now held.
    pub accepted: usize,
    /// Records dropped because their certificate fields disagree with status.
    pub rejected: Vec<RecordInvariantViolation>,
    /// Repeated ids dropped (first occurrence wins).
    pub duplicates: usize,
}

impl ReplaceReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.duplicates == 0
    }
}

#[derive(Default)]
struct Inner {
    /// Backend order is preserved.
    records: Vec<StudentRecord>,
    statistics: Option<AggregateStatistics>,
    revision: u64,
}

impl Inner {
    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// In-memory record collection.
///
/// Shared between the lifecycle controller and the presentation shell via
/// `Arc<RecordStore>`. All access goes through the methods below.
#[derive(Default)]
pub struct RecordStore {
    inner: RwLock<Inner>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fresh fetch.
    ///
    /// Records violating the certificate-field invariant are dropped and
    /// reported rather than stored.
    pub fn replace_all(&self, records: Vec<StudentRecord>) -> ReplaceReport {
        let mut report = ReplaceReport::default();
        let mut seen = HashSet::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            if let Err(violation) = record.check_invariants() {
                warn!(record_id = %record.id, error = %violation, "Dropping inconsistent record");
                report.rejected.push(violation);
                continue;
            }
            if !seen.insert(record.id) {
                warn!(record_id = %record.id, "Dropping duplicate record id");
                report.duplicates += 1;
                continue;
            }
            kept.push(record);
        }
        report.accepted = kept.len();

        let mut inner = self.inner.write();
        inner.records = kept;
        inner.bump();
        debug!(
            accepted = report.accepted,
            rejected = report.rejected.len(),
            revision = inner.revision,
            "Record store replaced"
        );
        report
    }

    /// Snapshot of all records in backend order.
    pub fn get(&self) -> Vec<StudentRecord> {
        self.inner.read().records.clone()
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<StudentRecord> {
        let inner = self.inner.read();
        inner.position(id).map(|i| inner.records[i].clone())
    }

    pub fn filter_by_status(&self, status: CertificateStatus) -> Vec<StudentRecord> {
        self.inner
            .read()
            .records
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    /// Apply a local, non-authoritative status projection.
    ///
    /// Only PENDING → QUEUED can be projected: later steps need fields the
    /// backend assigns. Returns the updated record.
    pub fn update_status(
        &self,
        id: RecordId,
        new_status: CertificateStatus,
    ) -> Result<StudentRecord, StoreError> {
        let mut inner = self.inner.write();
        let idx = inner.position(id).ok_or(StoreError::NotFound(id))?;

        let from = inner.records[idx].status;
        let projectable = from == CertificateStatus::Pending
            && new_status == CertificateStatus::Queued;
        if !projectable {
            return Err(StoreError::InvalidProjection {
                id,
                from,
                to: new_status,
            });
        }

        inner.records[idx].status = new_status;
        let updated = inner.records[idx].clone();
        inner.bump();
        debug!(record_id = %id, from = %from, to = %new_status, "Projected status");
        Ok(updated)
    }

    /// Remove a record from the local view. Returns it if it was present.
    pub fn remove(&self, id: RecordId) -> Option<StudentRecord> {
        let mut inner = self.inner.write();
        let idx = inner.position(id)?;
        let removed = inner.records.remove(idx);
        inner.bump();
        debug!(record_id = %id, "Record removed from local view");
        Some(removed)
    }

    /// Store the latest backend statistics snapshot.
    pub fn set_statistics(&self, statistics: AggregateStatistics) {
        let mut inner = self.inner.write();
        inner.statistics = Some(statistics);
        inner.bump();
    }

    /// Last fetched statistics, if any were fetched.
    pub fn statistics(&self) -> Option<AggregateStatistics> {
        self.inner.read().statistics.clone()
    }

    /// Monotonic mutation counter.
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }
}
