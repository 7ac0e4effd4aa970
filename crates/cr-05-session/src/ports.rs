//! Outbound port to the backend's authentication endpoints.

use async_trait::async_trait;
use shared_types::{GatewayError, LoginCredentials, NewAdministrator, SystemStatus, UserProfile};

/// Authentication backend (Driven Port).
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `GET /users/current`
    async fn current_user(&self) -> Result<UserProfile, GatewayError>;

    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, GatewayError>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<(), GatewayError>;

    /// `GET /auth/status`
    async fn system_status(&self) -> Result<SystemStatus, GatewayError>;

    /// `POST /users/setup`
    async fn setup_admin(&self, admin: &NewAdministrator) -> Result<UserProfile, GatewayError>;
}

/// Scripted auth backend for testing.
#[cfg(test)]
pub struct MockAuthGateway {
    pub user: parking_lot::Mutex<Option<UserProfile>>,
    pub password: String,
    pub setup_required: parking_lot::Mutex<bool>,
    pub fail_with: parking_lot::Mutex<Option<GatewayError>>,
    pub logouts: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockAuthGateway {
    pub fn new(user: Option<UserProfile>, password: &str) -> Self {
        Self {
            user: parking_lot::Mutex::new(user),
            password: password.to_string(),
            setup_required: parking_lot::Mutex::new(false),
            fail_with: parking_lot::Mutex::new(None),
            logouts: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Fail every call until cleared.
    pub fn fail(&self, err: Option<GatewayError>) {
        *self.fail_with.lock() = err;
    }

    fn check(&self) -> Result<(), GatewayError> {
        match self.fail_with.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn current_user(&self) -> Result<UserProfile, GatewayError> {
        self.check()?;
        self.user
            .lock()
            .clone()
            .ok_or_else(|| GatewayError::Unauthorized("Not authenticated".into()))
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, GatewayError> {
        self.check()?;
        let user = self.user.lock().clone();
        match user {
            Some(u) if u.username == credentials.username && credentials.password == self.password => {
                Ok(u)
            }
            _ => Err(GatewayError::Unauthorized("Invalid username or password".into())),
        }
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.logouts
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.check()
    }

    async fn system_status(&self) -> Result<SystemStatus, GatewayError> {
        self.check()?;
        let setup_required = *self.setup_required.lock();
        Ok(SystemStatus {
            setup_required,
            message: None,
        })
    }

    async fn setup_admin(&self, admin: &NewAdministrator) -> Result<UserProfile, GatewayError> {
        self.check()?;
        *self.setup_required.lock() = false;
        Ok(UserProfile {
            id: 1,
            username: admin.username.clone(),
            full_name: Some(admin.full_name.clone()),
            email: Some(admin.email.clone()),
            active: true,
            last_login: None,
        })
    }
}
