use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;

/// A booking linking one user to one doctor at a date/time with a status.
///
/// `time` is a zero-padded 24-hour `HH:MM` string so that lexicographic
/// ordering on (date, time) is chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub user_id: i64,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
