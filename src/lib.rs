//! Carebook core: persistence and session layer of a patient-facing
//! doctor appointment booking app.
//!
//! The screens (rendering, navigation, forms) live elsewhere and call in
//! through three surfaces: the [`auth`] gate (sign-up, login, logout,
//! start-up restore), the [`booking`] facade (validated booking, guarded
//! status lifecycle, display views), and the raw stores under
//! [`db::repository`]. Everything is backed by one embedded SQLite file
//! under `~/Carebook/`. The [`remote`] module is a parallel binding of the
//! same contract against a hosted backend; it is not wired into the local
//! flow.

pub mod auth;
pub mod booking;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod remote;

use tracing_subscriber::EnvFilter;

use crate::auth::AuthError;
use crate::core_state::CoreState;

/// Initialize tracing. RUST_LOG wins; otherwise the crate default.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// App-start bootstrap: ensure the data directory and schema exist, then
/// restore any persisted session. The returned state is ready for the
/// screens; `is_authenticated()` decides entry flow vs. authenticated area.
pub fn bootstrap() -> Result<CoreState, AuthError> {
    std::fs::create_dir_all(config::app_data_dir())?;

    let state = CoreState::with_default_paths();
    let conn = state.open_db()?;
    db::ensure_initialized(&conn)?;
    drop(conn);

    restore(&state)?;
    tracing::info!("Carebook core ready v{}", config::APP_VERSION);
    Ok(state)
}

fn restore(state: &CoreState) -> Result<(), AuthError> {
    match auth::restore_session(state)? {
        Some(user) => tracing::info!(user_id = user.id, "Resuming session"),
        None => tracing::debug!("No persisted session"),
    }
    Ok(())
}
