//! Lifecycle controller configuration.

use serde::{Deserialize, Serialize};
use shared_types::CertificateStatus;
use std::time::Duration;

/// Which slice of records a refresh fetches into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshScope {
    /// Every record (students view).
    #[default]
    All,
    /// Only records in one status (e.g. the degrees view holds QUEUED only).
    Status(CertificateStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Delay between a confirmed delivery and local removal of the record.
    pub delivery_grace: Duration,
    /// Re-fetch after every server-affecting call.
    pub refresh_after_mutation: bool,
    /// Initial refresh scope.
    pub scope: RefreshScope,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            delivery_grace: Duration::from_millis(1500),
            refresh_after_mutation: true,
            scope: RefreshScope::All,
        }
    }
}

impl LifecycleConfig {
    pub fn with_delivery_grace(mut self, grace: Duration) -> Self {
        self.delivery_grace = grace;
        self
    }

    pub fn with_refresh_after_mutation(mut self, enabled: bool) -> Self {
        self.refresh_after_mutation = enabled;
        self
    }

    pub fn with_scope(mut self, scope: RefreshScope) -> Self {
        self.scope = scope;
        self
    }
}
