//! The assembled desk.

use crate::container::config::{ConfigError, DeskConfig};
use crate::wiring::spawn_event_logger;
use cr_01_record_store::RecordStore;
use cr_02_action_tracker::ActionTracker;
use cr_03_lifecycle::LifecycleController;
use cr_04_verification::VerificationClient;
use cr_05_session::{FileIdentityCache, SessionContext};
use cr_06_backend_gateway::BackendClient;
use shared_bus::InMemoryEventBus;
use shared_types::{GatewayError, SessionView};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

pub type DeskSession = SessionContext<BackendClient, InMemoryEventBus>;
pub type DeskLifecycle = LifecycleController<BackendClient, InMemoryEventBus>;
pub type DeskVerification = VerificationClient<BackendClient>;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot build backend client: {0}")]
    Gateway(#[from] GatewayError),
}

/// Every component, wired around one backend client.
pub struct Desk {
    config: DeskConfig,
    bus: Arc<InMemoryEventBus>,
    gateway: Arc<BackendClient>,
    store: Arc<RecordStore>,
    tracker: Arc<ActionTracker>,
    session: Arc<DeskSession>,
    lifecycle: Arc<DeskLifecycle>,
    verification: Arc<DeskVerification>,
}

impl Desk {
    /// Build all components. Nothing is spawned and no request is made.
    pub fn new(config: DeskConfig) -> Result<Self, DeskError> {
        config.validate()?;

        let bus = Arc::new(InMemoryEventBus::new());
        let gateway = Arc::new(BackendClient::new(config.gateway_config())?);
        let store = Arc::new(RecordStore::new());
        let tracker = Arc::new(ActionTracker::new(config.tracker_config()));

        let cache = FileIdentityCache::new(config.session.identity_cache_path.clone());
        let session = Arc::new(SessionContext::new(
            Arc::clone(&gateway),
            Arc::clone(&bus),
            Box::new(cache),
        ));
        let session_view: Arc<dyn SessionView> = session.clone();

        let lifecycle = Arc::new(LifecycleController::new(
            Arc::clone(&gateway),
            Arc::clone(&bus),
            Arc::clone(&store),
            Arc::clone(&tracker),
            session_view,
            config.lifecycle_config(),
        ));
        let verification = Arc::new(VerificationClient::new(Arc::clone(&gateway)));

        info!(
            backend = %config.backend.base_url,
            watchdog_ms = config.tracker.watchdog_timeout_ms,
            grace_ms = config.lifecycle.delivery_grace_ms,
            "Desk assembled"
        );

        Ok(Self {
            config,
            bus,
            gateway,
            store,
            tracker,
            session,
            lifecycle,
            verification,
        })
    }

    /// Spawn the tracker watchdog and the event logger.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_background_tasks(&self) -> Vec<JoinHandle<()>> {
        vec![self.tracker.spawn_watchdog(), spawn_event_logger(&self.bus)]
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    pub fn gateway(&self) -> &Arc<BackendClient> {
        &self.gateway
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn tracker(&self) -> &Arc<ActionTracker> {
        &self.tracker
    }

    pub fn session(&self) -> &Arc<DeskSession> {
        &self.session
    }

    pub fn lifecycle(&self) -> &Arc<DeskLifecycle> {
        &self.lifecycle
    }

    pub fn verification(&self) -> &Arc<DeskVerification> {
        &self.verification
    }
}
