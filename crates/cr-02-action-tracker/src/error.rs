//! Error types for the action tracker.

use shared_types::{ActionKind, ErrorKind, Failure, RecordId};
use std::time::Duration;
use thiserror::Error;

/// `begin` on a pair that already has a live token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Already processing {kind} for record {entity}")]
pub struct AlreadyInFlight {
    pub entity: RecordId,
    pub kind: ActionKind,
    /// How long the existing token has been held.
    pub held_for: Duration,
}

impl AlreadyInFlight {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ActionAlreadyInFlight
    }

    pub fn to_failure(&self) -> Failure {
        Failure::new(self.kind(), self.to_string()).for_record(self.entity)
    }
}
