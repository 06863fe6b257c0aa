//! Application state passed explicitly through the UI boundary.
//!
//! `CoreState` replaces the ambient global the screens would otherwise
//! reach for: it owns the storage locations and the active session slot.
//! Every store operation opens its own connection via `open_db()`; there
//! is no long-lived shared handle across calls. SQLite serializes writers.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

use thiserror::Error;

use crate::auth::session::ActiveSession;
use crate::config;
use crate::db::{self, DatabaseError};
use crate::models::User;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("State lock poisoned")]
    LockPoisoned,

    #[error("No active session")]
    NoActiveSession,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Shared application state: storage paths plus the active session.
///
/// Wrapped in `Arc` by callers that fan it out to multiple screens. Uses
/// `RwLock` so session reads (most operations) never block each other.
pub struct CoreState {
    db_path: PathBuf,
    session_path: PathBuf,
    session: RwLock<Option<ActiveSession>>,
}

impl CoreState {
    pub fn new(db_path: PathBuf, session_path: PathBuf) -> Self {
        Self {
            db_path,
            session_path,
            session: RwLock::new(None),
        }
    }

    /// State rooted at the default `~/Carebook/` locations.
    pub fn with_default_paths() -> Self {
        Self::new(config::database_path(), config::session_file())
    }

    /// Open a fresh database connection for one operation.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    // ── Session access ──────────────────────────────────────

    /// Acquire a read lock on the session slot.
    pub fn read_session(
        &self,
    ) -> Result<RwLockReadGuard<'_, Option<ActiveSession>>, CoreError> {
        self.session.read().map_err(|_| CoreError::LockPoisoned)
    }

    /// Set the active session (login/restore).
    pub fn set_session(&self, session: ActiveSession) -> Result<(), CoreError> {
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Some(session);
        Ok(())
    }

    /// Clear the active session (logout/stale token).
    pub fn clear_session(&self) -> Result<(), CoreError> {
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = None;
        Ok(())
    }

    /// Whether a user is currently logged in.
    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Snapshot of the logged-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.user.clone()))
    }

    /// The logged-in user, or `NoActiveSession` for screens that require one.
    pub fn require_user(&self) -> Result<User, CoreError> {
        self.current_user().ok_or(CoreError::NoActiveSession)
    }
}
