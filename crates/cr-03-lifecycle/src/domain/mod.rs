//! Domain layer for the lifecycle controller.

pub mod config;
pub mod import;
pub mod outcome;

pub use config::{LifecycleConfig, RefreshScope};
pub use import::{is_conflict_report, parse_import_conflicts};
pub use outcome::{
    DeliveryReceipt, EmailRequest, GenerationOutcome, GenerationReceipt, ImportOutcome,
    ImportReceipt, PendingRemoval, QueueOutcome,
};
