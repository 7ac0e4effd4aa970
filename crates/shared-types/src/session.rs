//! # Session Identity
//!
//! Shapes exchanged with the authentication endpoints and the read-only
//! view of the session that other components consult.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user profile as returned by `/users/current` and `/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

fn default_active() -> bool {
    true
}

impl UserProfile {
    /// Name to show in greetings, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Setup-state flags from `/auth/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemStatus {
    pub setup_required: bool,
    pub message: Option<String>,
}

/// Credentials for `/auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Initial administrator account for `/users/setup`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdministrator {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

impl fmt::Debug for NewAdministrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAdministrator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish()
    }
}

/// Read-only view of the process-wide session.
pub trait SessionView: Send + Sync {
    fn identity(&self) -> Option<UserProfile>;

    fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }
}
