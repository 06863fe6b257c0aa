//! Session/auth gate: sign-up, login, logout, and start-up restore.
//!
//! Credentials are stored as salted PBKDF2 hashes and compared in constant
//! time. The persisted session marker is only trusted after the user row is
//! re-verified against the database, so a stale token from a deleted
//! account falls back to the entry flow instead of a phantom login.

pub mod password;
pub mod session;

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::core_state::{CoreError, CoreState};
use crate::db::{repository, DatabaseError};
use crate::models::User;
use self::session::ActiveSession;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("State error: {0}")]
    Core(#[from] CoreError),

    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-().]{5,19}$").expect("valid regex"))
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

pub fn validate_phone(phone: &str) -> Result<(), AuthError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(AuthError::InvalidPhone(phone.to_string()))
    }
}

/// Create an account and log it in.
pub fn signup(
    state: &CoreState,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<User, AuthError> {
    validate_email(email)?;
    validate_phone(phone)?;

    let conn = state.open_db()?;
    let password_hash = password::hash_password(password);

    let id = repository::user::add_user(&conn, first_name, last_name, email, phone, &password_hash)
        .map_err(|e| {
            if e.is_constraint_violation() {
                AuthError::EmailTaken
            } else {
                AuthError::Database(e)
            }
        })?;

    let user = User {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password_hash,
    };

    open_session(state, user.clone())?;
    tracing::info!(user_id = id, "Account created");
    Ok(user)
}

/// Authenticate by email + password and open a session.
///
/// Unknown email and wrong password fail identically so the entry screen
/// cannot be used to enumerate accounts.
pub fn login(state: &CoreState, email: &str, password: &str) -> Result<User, AuthError> {
    let conn = state.open_db()?;

    let Some(user) = repository::user::get_user_by_email(&conn, email)? else {
        return Err(AuthError::InvalidCredentials);
    };
    if !password::verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    open_session(state, user.clone())?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(user)
}

/// Clear the in-memory session and the persisted marker.
pub fn logout(state: &CoreState) -> Result<(), AuthError> {
    state.clear_session()?;
    session::clear_stored(state.session_path())?;
    tracing::info!("User logged out");
    Ok(())
}

/// App-start lifecycle: load the persisted marker, validate it against the
/// database, and only then expose the authenticated state. Returns the
/// restored user, or `None` when there is no (valid) session.
pub fn restore_session(state: &CoreState) -> Result<Option<User>, AuthError> {
    let Some(stored) = session::load_stored(state.session_path())? else {
        return Ok(None);
    };

    let conn = state.open_db()?;
    match repository::user::get_user_by_id(&conn, stored.user_id)? {
        Some(user) if user.email == stored.email => {
            state.set_session(ActiveSession::restored(user.clone(), stored.token))?;
            tracing::info!(user_id = user.id, "Session restored");
            Ok(Some(user))
        }
        _ => {
            // Stale token: the account is gone or the email changed under it
            tracing::warn!(user_id = stored.user_id, "Discarding stale session");
            session::clear_stored(state.session_path())?;
            state.clear_session()?;
            Ok(None)
        }
    }
}

fn open_session(state: &CoreState, user: User) -> Result<(), AuthError> {
    let active = ActiveSession::new(user);
    session::save_stored(state.session_path(), &active.to_stored())?;
    state.set_session(active)?;
    Ok(())
}
