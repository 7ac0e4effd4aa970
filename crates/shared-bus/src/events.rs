//! # Desk Events
//!
//! Notices that flow through the bus. Each carries enough context for a
//! shell to render a one-line message without looking anything up.

use serde::{Deserialize, Serialize};
use shared_types::{DeliveryMode, Failure, RecordId};

/// All notices that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeskEvent {
    // =========================================================================
    // LIFECYCLE (cr-03)
    // =========================================================================
    /// A PENDING record was moved to QUEUED.
    RecordQueued { record: RecordId, student_id: String },

    /// The backend generated a certificate for a QUEUED record.
    CertificateGenerated {
        record: RecordId,
        certificate_id: Option<String>,
        transaction_id: Option<String>,
    },

    /// A certificate was downloaded or emailed.
    CertificateDelivered {
        record: RecordId,
        certificate_id: String,
        mode: DeliveryMode,
    },

    /// A delivered record left the local view.
    RecordRemoved { record: RecordId },

    /// A spreadsheet batch was accepted by the backend.
    BatchImported { imported: usize, message: String },

    // =========================================================================
    // FAILURES (any component)
    // =========================================================================
    /// An operation failed. Scoped to one record when `failure.record` is set.
    OperationFailed { source: String, failure: Failure },

    // =========================================================================
    // SESSION (cr-05)
    // =========================================================================
    /// A user signed in.
    SessionStarted { username: String },

    /// The session was torn down (logout or failed reconciliation).
    SessionEnded { username: Option<String> },
}

impl DeskEvent {
    /// Topic used for subscription filtering.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::RecordQueued { .. } | Self::CertificateGenerated { .. } => EventTopic::Lifecycle,
            Self::CertificateDelivered { .. } | Self::RecordRemoved { .. } => EventTopic::Delivery,
            Self::BatchImported { .. } => EventTopic::Import,
            Self::OperationFailed { .. } => EventTopic::Failures,
            Self::SessionStarted { .. } | Self::SessionEnded { .. } => EventTopic::Session,
        }
    }

    /// Record the notice concerns, if any.
    #[must_use]
    pub fn record(&self) -> Option<RecordId> {
        match self {
            Self::RecordQueued { record, .. }
            | Self::CertificateGenerated { record, .. }
            | Self::CertificateDelivered { record, .. }
            | Self::RecordRemoved { record } => Some(*record),
            Self::OperationFailed { failure, .. } => failure.record,
            _ => None,
        }
    }

    /// Human-readable notice text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::RecordQueued { student_id, .. } => {
                format!("Student {} queued for certificate generation", student_id)
            }
            Self::CertificateGenerated {
                certificate_id: Some(cert),
                ..
            } => format!("Certificate {} generated", cert),
            Self::CertificateGenerated { record, .. } => {
                format!("Certificate generated for record {}", record)
            }
            Self::CertificateDelivered {
                certificate_id,
                mode: DeliveryMode::Download,
                ..
            } => format!("Certificate {} downloaded", certificate_id),
            Self::CertificateDelivered {
                certificate_id,
                mode: DeliveryMode::Email,
                ..
            } => format!("Certificate {} emailed", certificate_id),
            Self::RecordRemoved { record } => {
                format!("Record {} was removed from the list", record)
            }
            Self::BatchImported { message, .. } => message.clone(),
            Self::OperationFailed { failure, .. } => failure.to_string(),
            Self::SessionStarted { username } => format!("Signed in as {}", username),
            Self::SessionEnded { username: Some(u) } => format!("{} signed out", u),
            Self::SessionEnded { username: None } => "Session ended".to_string(),
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Queue and generation notices.
    Lifecycle,
    /// Download, email and removal notices.
    Delivery,
    /// Batch import notices.
    Import,
    /// Failed operations.
    Failures,
    /// Sign-in and sign-out.
    Session,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific notices.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Records to include. Empty means all records (and record-less notices).
    pub records: Vec<RecordId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            records: Vec::new(),
        }
    }

    /// Restrict to notices about one record (a per-row error badge, say).
    #[must_use]
    pub fn for_record(mut self, record: RecordId) -> Self {
        self.records.push(record);
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &DeskEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let record_match = self.records.is_empty()
            || event
                .record()
                .map(|r| self.records.contains(&r))
                .unwrap_or(false);

        topic_match && record_match
    }
}
