//! # Session Context
//!
//! Owns the process-wide identity. Other components only read it through
//! [`SessionView`].

use crate::cache::IdentityCache;
use crate::error::SessionError;
use crate::ports::AuthGateway;
use parking_lot::RwLock;
use shared_bus::{DeskEvent, EventPublisher};
use shared_types::{LoginCredentials, NewAdministrator, SessionView, SystemStatus, UserProfile};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SessionContext<G: AuthGateway, P: EventPublisher> {
    gateway: Arc<G>,
    publisher: Arc<P>,
    cache: Box<dyn IdentityCache>,
    identity: RwLock<Option<UserProfile>>,
}

impl<G: AuthGateway, P: EventPublisher> SessionContext<G, P> {
    pub fn new(gateway: Arc<G>, publisher: Arc<P>, cache: Box<dyn IdentityCache>) -> Self {
        Self {
            gateway,
            publisher,
            cache,
            identity: RwLock::new(None),
        }
    }

    /// Reconcile the cached identity with the backend.
    ///
    /// With nothing cached no request is made. A failed check clears both the
    /// in-memory identity and the cache.
    pub async fn initialize(&self) -> Option<UserProfile> {
        let cached = match self.cache.load() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable identity cache");
                self.clear_cache();
                None
            }
        };
        let cached = cached?;

        match self.gateway.current_user().await {
            Ok(fresh) => {
                info!(username = %fresh.username, "Session restored");
                self.adopt(fresh.clone());
                Some(fresh)
            }
            Err(e) => {
                warn!(username = %cached.username, error = %e, "Cached session is no longer valid");
                self.tear_down(Some(cached.username)).await;
                None
            }
        }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, SessionError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let profile = self
            .gateway
            .login(credentials)
            .await
            .map_err(SessionError::from_gateway)?;

        info!(username = %profile.username, "Signed in");
        self.adopt(profile.clone());
        self.publisher
            .publish(DeskEvent::SessionStarted {
                username: profile.username.clone(),
            })
            .await;
        Ok(profile)
    }

    /// Sign out. Local state is cleared even when the backend call fails;
    /// that failure is still returned.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let result = self.gateway.logout().await;
        let username = self.identity.read().as_ref().map(|p| p.username.clone());
        self.tear_down(username).await;

        result.map_err(|e| {
            warn!(error = %e, "Backend logout failed; local session cleared anyway");
            SessionError::from_gateway(e)
        })
    }

    /// Re-read the identity from the backend.
    ///
    /// Signed out sessions return `None` without asking the backend. On
    /// failure the current identity is kept and `None` is returned.
    pub async fn refresh_user(&self) -> Option<UserProfile> {
        if self.identity.read().is_none() {
            return None;
        }
        match self.gateway.current_user().await {
            Ok(profile) => {
                self.adopt(profile.clone());
                Some(profile)
            }
            Err(e) => {
                debug!(error = %e, "Identity refresh failed");
                None
            }
        }
    }

    pub async fn check_system_status(&self) -> Result<SystemStatus, SessionError> {
        self.gateway
            .system_status()
            .await
            .map_err(SessionError::from_gateway)
    }

    /// Create the first administrator. Only allowed while setup is required.
    pub async fn setup_initial_admin(
        &self,
        admin: &NewAdministrator,
    ) -> Result<UserProfile, SessionError> {
        if !self.check_system_status().await?.setup_required {
            return Err(SessionError::SetupNotRequired);
        }
        if admin.username.trim().is_empty() || admin.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        let created = self
            .gateway
            .setup_admin(admin)
            .await
            .map_err(SessionError::from_gateway)?;
        info!(username = %created.username, "Initial administrator created");
        Ok(created)
    }

    /// Identity or `NotAuthenticated`.
    pub fn require_identity(&self) -> Result<UserProfile, SessionError> {
        self.identity().ok_or(SessionError::NotAuthenticated)
    }

    fn adopt(&self, profile: UserProfile) {
        if let Err(e) = self.cache.store(&profile) {
            warn!(error = %e, "Could not cache identity");
        }
        *self.identity.write() = Some(profile);
    }

    fn clear_cache(&self) {
        if let Err(e) = self.cache.clear() {
            warn!(error = %e, "Could not clear identity cache");
        }
    }

    async fn tear_down(&self, username: Option<String>) {
        *self.identity.write() = None;
        self.clear_cache();
        self.publisher
            .publish(DeskEvent::SessionEnded { username })
            .await;
    }
}

impl<G: AuthGateway, P: EventPublisher> SessionView for SessionContext<G, P> {
    fn identity(&self) -> Option<UserProfile> {
        self.identity.read().clone()
    }
}
