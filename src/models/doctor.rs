use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Provider record. Reference data: the app reads it, seeding writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub specialty_id: Option<String>,
    pub rating: f64,
    pub reviews_count: i64,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Doctor {
    /// Display name as the booking screens render it ("Dr. Jane Doe").
    pub fn display_name(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => {
                format!("{} {} {}", title, self.first_name, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}
