//! Local identity cache.
//!
//! The cache only remembers who was signed in last; it is never trusted on
//! its own. `SessionContext::initialize` confirms it against the backend.

use crate::error::SessionError;
use parking_lot::Mutex;
use shared_types::UserProfile;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait IdentityCache: Send + Sync {
    fn load(&self) -> Result<Option<UserProfile>, SessionError>;
    fn store(&self, profile: &UserProfile) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file cache.
#[derive(Debug, Clone)]
pub struct FileIdentityCache {
    path: PathBuf,
}

impl FileIdentityCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn cache_error(path: &Path, err: impl std::fmt::Display) -> SessionError {
    SessionError::Cache(format!("{}: {}", path.display(), err))
}

impl IdentityCache for FileIdentityCache {
    fn load(&self) -> Result<Option<UserProfile>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_error(&self.path, e)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| cache_error(&self.path, e))
    }

    fn store(&self, profile: &UserProfile) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| cache_error(parent, e))?;
        }
        let json = serde_json::to_string_pretty(profile).map_err(|e| cache_error(&self.path, e))?;
        fs::write(&self.path, json).map_err(|e| cache_error(&self.path, e))?;
        debug!(path = %self.path.display(), "Identity cached");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(cache_error(&self.path, e)),
        }
    }
}

/// In-process cache, for shells that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryIdentityCache {
    profile: Mutex<Option<UserProfile>>,
}

impl MemoryIdentityCache {
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: Mutex::new(Some(profile)),
        }
    }
}

impl IdentityCache for MemoryIdentityCache {
    fn load(&self) -> Result<Option<UserProfile>, SessionError> {
        Ok(self.profile.lock().clone())
    }

    fn store(&self, profile: &UserProfile) -> Result<(), SessionError> {
        *self.profile.lock() = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.profile.lock() = None;
        Ok(())
    }
}
