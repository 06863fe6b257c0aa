use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Specialty lookup entity. Static reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}
