use std::path::Path;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;
use crate::models::User;

/// In-memory session for a logged-in user.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub user: User,
    /// Opaque marker persisted alongside the user id.
    pub token: String,
    pub logged_in_at: NaiveDateTime,
}

impl ActiveSession {
    /// Fresh session at login time.
    pub fn new(user: User) -> Self {
        Self {
            user,
            token: Uuid::new_v4().to_string(),
            logged_in_at: Local::now().naive_local(),
        }
    }

    /// Session rebuilt from a validated persisted marker.
    pub fn restored(user: User, token: String) -> Self {
        Self {
            user,
            token,
            logged_in_at: Local::now().naive_local(),
        }
    }

    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            user_id: self.user.id,
            email: self.user.email.clone(),
            token: self.token.clone(),
        }
    }
}

/// Persisted session marker. Deliberately thin: the user record itself is
/// re-read and validated at restore time, never trusted from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: i64,
    pub email: String,
    pub token: String,
}

/// Read the persisted session marker. `None` when absent or unreadable:
/// a corrupt file is treated as "not logged in", not a start-up failure.
pub fn load_stored(path: &Path) -> Result<Option<StoredSession>, AuthError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    match serde_json::from_str(&raw) {
        Ok(stored) => Ok(Some(stored)),
        Err(e) => {
            tracing::warn!("Discarding unreadable session file: {e}");
            clear_stored(path)?;
            Ok(None)
        }
    }
}

/// Write the persisted session marker.
pub fn save_stored(path: &Path, stored: &StoredSession) -> Result<(), AuthError> {
    let raw = serde_json::to_string(stored)?;
    std::fs::write(path, raw)?;
    Ok(())
}

/// Remove the persisted session marker. No-op when absent.
pub fn clear_stored(path: &Path) -> Result<(), AuthError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AuthError::from(e)),
    }
}
