use serde::{Deserialize, Serialize};

/// Account record created on sign-up.
///
/// `password_hash` holds the PBKDF2 encoded hash produced by
/// `auth::password`, never a plaintext credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
