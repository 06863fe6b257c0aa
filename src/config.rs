use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Carebook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> &'static str {
    "carebook=info"
}

/// Get the application data directory
/// ~/Carebook/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Carebook")
}

/// Path of the embedded appointment database
pub fn database_path() -> PathBuf {
    app_data_dir().join("carebook.db")
}

/// Path of the persisted session marker
pub fn session_file() -> PathBuf {
    app_data_dir().join("session.json")
}
