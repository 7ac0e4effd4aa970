//! # Core Domain Entities
//!
//! Defines the records and values the desk works with.
//!
//! ## Clusters
//!
//! - **Records**: `StudentRecord`, `RecordId`, `CertificateStatus`
//! - **Statistics**: `AggregateStatistics`, `StatusCounts`, `DepartmentStats`
//! - **Actions**: `ActionKind`, `DeliveryMode`
//! - **Verification**: `VerificationResult`, `CertificateDetails`
//! - **Files**: `Upload`, `CertificateDocument`

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CLUSTER A: RECORDS
// =============================================================================

/// Internal, stable identity of a record (assigned by the backend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Certificate lifecycle status of a record.
///
/// ```text
/// [PENDING] ──queue──→ [QUEUED] ──generate──→ [ISSUED] ──deliver──→ (removed)
/// ```
///
/// The ordering of the variants is the lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CertificateStatus {
    /// Imported, not yet queued for generation.
    Pending,
    /// Waiting for certificate generation.
    Queued,
    /// Certificate generated (and anchored once `transaction_id` is present).
    Issued,
}

impl CertificateStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [CertificateStatus; 3] = [Self::Pending, Self::Queued, Self::Issued];

    /// Wire representation (`PENDING`, `QUEUED`, `ISSUED`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Queued => "QUEUED",
            Self::Issued => "ISSUED",
        }
    }

    /// The single status that may follow this one, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Queued),
            Self::Queued => Some(Self::Issued),
            Self::Issued => None,
        }
    }

    /// Whether moving from `self` to `target` is exactly one step forward.
    pub fn can_advance_to(&self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that is not one of the known lifecycle statuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown certificate status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for CertificateStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "QUEUED" => Ok(Self::Queued),
            "ISSUED" => Ok(Self::Issued),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// One certificate-eligible student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Internal identity, stable across refreshes.
    pub id: RecordId,
    /// Institution-assigned identifier, unique per institution.
    pub student_id: String,
    pub student_name: String,
    pub degree_name: String,
    pub university_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<String>,
    pub status: CertificateStatus,
    /// Present only once the record is ISSUED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    /// Ledger reference, present only once ISSUED and anchored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// A record whose certificate fields disagree with its status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordInvariantViolation {
    #[error("Record {id} carries a certificate id while {status}")]
    CertificateBeforeIssue { id: RecordId, status: CertificateStatus },

    #[error("Record {id} carries a ledger transaction while {status}")]
    LedgerBeforeIssue { id: RecordId, status: CertificateStatus },

    #[error("Record {id} is ISSUED without a certificate id")]
    IssuedWithoutCertificate { id: RecordId },
}

impl StudentRecord {
    /// Check the certificate-field invariant.
    ///
    /// `certificate_id` and `transaction_id` must be absent unless ISSUED, and
    /// an ISSUED record must carry a `certificate_id`. The ledger reference may
    /// lag behind issuance.
    pub fn check_invariants(&self) -> Result<(), RecordInvariantViolation> {
        if self.status != CertificateStatus::Issued {
            if self.certificate_id.is_some() {
                return Err(RecordInvariantViolation::CertificateBeforeIssue {
                    id: self.id,
                    status: self.status,
                });
            }
            if self.transaction_id.is_some() {
                return Err(RecordInvariantViolation::LedgerBeforeIssue {
                    id: self.id,
                    status: self.status,
                });
            }
        } else if self.certificate_id().is_none() {
            return Err(RecordInvariantViolation::IssuedWithoutCertificate { id: self.id });
        }
        Ok(())
    }

    /// Certificate id, ignoring blank values.
    pub fn certificate_id(&self) -> Option<&str> {
        non_blank(self.certificate_id.as_deref())
    }

    /// Delivery address, ignoring blank values.
    pub fn delivery_email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Whether the certificate has been anchored on the ledger.
    pub fn is_anchored(&self) -> bool {
        non_blank(self.transaction_id.as_deref()).is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// CLUSTER B: STATISTICS
// =============================================================================

/// Count of records per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCounts {
    #[serde(deserialize_with = "zero_if_null")]
    pub pending: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub queued: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub issued: u64,
}

/// Aggregate queries report `null` for empty groups.
fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Option::<u64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl StatusCounts {
    pub fn get(&self, status: CertificateStatus) -> u64 {
        match status {
            CertificateStatus::Pending => self.pending,
            CertificateStatus::Queued => self.queued,
            CertificateStatus::Issued => self.issued,
        }
    }

    pub fn total(&self) -> u64 {
        self.pending + self.queued + self.issued
    }
}

/// Per-department status breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentStats {
    pub department: String,
    #[serde(deserialize_with = "zero_if_null")]
    pub pending: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub queued: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub issued: u64,
}

/// Backend-computed statistics snapshot.
///
/// Display-only: the desk never derives these counts from its local records,
/// because the local view may be filtered or stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregateStatistics {
    pub status_counts: StatusCounts,
    pub department_stats: Vec<DepartmentStats>,
}

// =============================================================================
// CLUSTER C: ACTIONS
// =============================================================================

/// Kind of per-record operation tracked for mutual exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Certificate generation.
    Generate,
    /// Certificate download.
    Download,
    /// Certificate email delivery.
    Email,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Download => "download",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an issued certificate reaches the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Download,
    Email,
}

impl DeliveryMode {
    /// The tracker action kind guarding this delivery mode.
    pub fn action_kind(&self) -> ActionKind {
        match self {
            Self::Download => ActionKind::Download,
            Self::Email => ActionKind::Email,
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_kind().as_str())
    }
}

// =============================================================================
// CLUSTER D: VERIFICATION
// =============================================================================

/// Certificate fields returned for an authentic certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateDetails {
    pub student_name: String,
    pub degree_name: String,
    pub university_name: String,
    /// Long-form timestamp as rendered by the backend.
    pub graduation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Outcome value of one verification request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_details: Option<CertificateDetails>,
}

impl VerificationResult {
    /// A result that could not be proven valid.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            certificate_details: None,
        }
    }

    /// An authentic result carrying the certificate fields.
    pub fn authentic(details: CertificateDetails) -> Self {
        Self {
            valid: true,
            certificate_details: Some(details),
        }
    }

    /// Drop details attached to a negative result.
    pub fn normalized(mut self) -> Self {
        if !self.valid {
            self.certificate_details = None;
        }
        self
    }
}

// =============================================================================
// CLUSTER E: FILES
// =============================================================================

/// A file forwarded to the backend (spreadsheet import, certificate upload).
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Case-insensitive check of the file extension.
    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A downloaded certificate document.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateDocument {
    pub certificate_id: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for CertificateDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateDocument")
            .field("certificate_id", &self.certificate_id)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
