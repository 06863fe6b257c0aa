//! Booking facade: the function surface the screens call.
//!
//! Validates request shape (real calendar date, normalizable time, bounded
//! notes, known and available doctor) before any row is written, joins
//! doctor and specialty info for display, and guards status changes with
//! the appointment lifecycle. The store layer underneath stays unguarded.

use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::db::repository::{appointment, doctor, parse_date};
use crate::db::DatabaseError;
use crate::models::AppointmentStatus;

/// Free-text limit for visit notes, matching what the form accepts.
pub const MAX_NOTES_LEN: usize = 2000;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time: {0} (expected HH:MM or hh:mm AM/PM)")]
    InvalidTime(String),

    #[error("Notes too long (max 2000 chars)")]
    NotesTooLong,

    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Doctor is not currently accepting appointments: {0}")]
    DoctorUnavailable(String),

    #[error("Appointment not found: {0}")]
    NotFound(i64),

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// What the booking screen submits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day as the screen renders it: `HH:MM` or `hh:mm AM/PM`.
    pub time: String,
    pub notes: Option<String>,
}

/// Appointment joined with doctor + specialty for the list screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: i64,
    pub doctor_id: String,
    pub doctor_name: String,
    pub specialty: String,
    pub avatar_url: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub notes: String,
}

/// Normalize a screen time string to sortable 24-hour `HH:MM`.
///
/// The 12-hour form the booking screen uses ("09:00 AM", "01:00 PM") does
/// not sort as text across the noon boundary; everything is stored
/// zero-padded 24-hour so `ORDER BY date, time` is chronological.
pub fn normalize_time(input: &str) -> Result<String, BookingError> {
    let trimmed = input.trim();
    let upper = trimmed.to_uppercase();

    for fmt in ["%H:%M", "%I:%M %p"] {
        if let Ok(t) = NaiveTime::parse_from_str(&upper, fmt) {
            return Ok(t.format("%H:%M").to_string());
        }
    }
    Err(BookingError::InvalidTime(trimmed.to_string()))
}

fn parse_request_date(raw: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDate(raw.to_string()))
}

/// Validate a booking request and insert it. The new appointment is always
/// `pending`; returns its id.
pub fn book_appointment(
    conn: &Connection,
    user_id: i64,
    request: &BookingRequest,
) -> Result<i64, BookingError> {
    let date = parse_request_date(&request.date)?;
    let time = normalize_time(&request.time)?;

    if let Some(notes) = &request.notes {
        if notes.len() > MAX_NOTES_LEN {
            return Err(BookingError::NotesTooLong);
        }
    }

    let doctor = doctor::get_doctor(conn, &request.doctor_id)?
        .ok_or_else(|| BookingError::UnknownDoctor(request.doctor_id.clone()))?;
    if !doctor.is_available {
        return Err(BookingError::DoctorUnavailable(doctor.id));
    }

    let id = appointment::create_appointment(
        conn,
        user_id,
        &doctor.id,
        &date,
        &time,
        request.notes.as_deref(),
    )?;
    tracing::info!(appointment_id = id, "Appointment booked");
    Ok(id)
}

// ── Guarded lifecycle ───────────────────────────────────────

/// pending → confirmed
pub fn confirm_appointment(conn: &Connection, id: i64) -> Result<(), BookingError> {
    transition(conn, id, AppointmentStatus::Confirmed)
}

/// confirmed → completed
pub fn complete_appointment(conn: &Connection, id: i64) -> Result<(), BookingError> {
    transition(conn, id, AppointmentStatus::Completed)
}

/// pending/confirmed → cancelled
pub fn cancel_appointment(conn: &Connection, id: i64) -> Result<(), BookingError> {
    transition(conn, id, AppointmentStatus::Cancelled)
}

fn transition(conn: &Connection, id: i64, to: AppointmentStatus) -> Result<(), BookingError> {
    let current = appointment::get_appointment(conn, id)?
        .ok_or(BookingError::NotFound(id))?;

    if !current.status.can_transition_to(to) {
        return Err(BookingError::InvalidTransition {
            from: current.status.as_str(),
            to: to.as_str(),
        });
    }

    appointment::update_appointment_status(conn, id, to)?;
    Ok(())
}

// ── Display queries ─────────────────────────────────────────

const VIEW_COLUMNS: &str = "a.id, a.doctor_id, d.title, d.first_name, d.last_name,
    COALESCE(s.name, ''), d.avatar_url, a.date, a.time, a.status, a.notes";

const VIEW_JOINS: &str = "FROM appointments a
    JOIN doctors d ON a.doctor_id = d.id
    LEFT JOIN specialties s ON d.specialty_id = s.id";

fn view_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(AppointmentView, String)> {
    let title: Option<String> = row.get(2)?;
    let first: String = row.get(3)?;
    let last: String = row.get(4)?;
    let doctor_name = match title.as_deref() {
        Some(t) if !t.is_empty() => format!("{t} {first} {last}"),
        _ => format!("{first} {last}"),
    };

    let status: String = row.get(9)?;
    Ok((
        AppointmentView {
            id: row.get(0)?,
            doctor_id: row.get(1)?,
            doctor_name,
            specialty: row.get(5)?,
            avatar_url: row.get(6)?,
            date: parse_date(&row.get::<_, String>(7)?),
            time: row.get(8)?,
            // Placeholder, replaced after the strict parse below
            status: AppointmentStatus::Pending,
            notes: row.get(10)?,
        },
        status,
    ))
}

fn collect_views(
    rows: impl Iterator<Item = rusqlite::Result<(AppointmentView, String)>>,
) -> Result<Vec<AppointmentView>, BookingError> {
    rows.map(|r| {
        let (mut view, status) = r.map_err(DatabaseError::from)?;
        view.status = AppointmentStatus::from_str(&status)?;
        Ok(view)
    })
    .collect()
}

/// Upcoming appointments for the tab screens, joined for display.
pub fn upcoming_appointments(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<AppointmentView>, BookingError> {
    let today = Local::now().date_naive();
    let mut stmt = conn.prepare(&format!(
        "SELECT {VIEW_COLUMNS} {VIEW_JOINS}
         WHERE a.user_id = ?1
           AND a.date >= ?2
           AND a.status IN ('pending', 'confirmed')
         ORDER BY a.date, a.time"
    )).map_err(DatabaseError::from)?;
    let rows = stmt
        .query_map(params![user_id, today.to_string()], view_from_row)
        .map_err(DatabaseError::from)?;
    collect_views(rows)
}

/// Past appointments: settled or already behind us, most recent first.
pub fn past_appointments(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<AppointmentView>, BookingError> {
    let today = Local::now().date_naive();
    let mut stmt = conn.prepare(&format!(
        "SELECT {VIEW_COLUMNS} {VIEW_JOINS}
         WHERE a.user_id = ?1
           AND (a.status IN ('completed', 'cancelled') OR a.date < ?2)
         ORDER BY a.date DESC, a.time DESC"
    )).map_err(DatabaseError::from)?;
    let rows = stmt
        .query_map(params![user_id, today.to_string()], view_from_row)
        .map_err(DatabaseError::from)?;
    collect_views(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::user::add_user;
    use crate::db::sqlite::open_memory_database;
    use chrono::Duration;

    fn setup_db() -> (Connection, i64) {
        let conn = open_memory_database().unwrap();
        let user_id = add_user(&conn, "Ada", "Lovelace", "ada@example.com", "555-0100", "h")
            .unwrap();
        conn.execute(
            "INSERT INTO specialties (id, name) VALUES ('cardio', 'Cardiology')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO doctors (id, first_name, last_name, title, specialty_id, is_available)
             VALUES ('doc-1', 'Grace', 'Hopper', 'Dr.', 'cardio', 1),
                    ('doc-2', 'Alan', 'Turing', NULL, 'cardio', 0)",
            [],
        )
        .unwrap();
        (conn, user_id)
    }

    fn request(date: String, time: &str) -> BookingRequest {
        BookingRequest {
            doctor_id: "doc-1".to_string(),
            date,
            time: time.to_string(),
            notes: None,
        }
    }

    fn tomorrow() -> String {
        (Local::now().date_naive() + Duration::days(1)).to_string()
    }

    #[test]
    fn normalize_time_accepts_both_clock_styles() {
        assert_eq!(normalize_time("09:00").unwrap(), "09:00");
        assert_eq!(normalize_time("9:00").unwrap(), "09:00");
        assert_eq!(normalize_time("09:00 AM").unwrap(), "09:00");
        assert_eq!(normalize_time("01:00 PM").unwrap(), "13:00");
        assert_eq!(normalize_time("1:00 pm").unwrap(), "13:00");
        assert_eq!(normalize_time(" 04:00 PM ").unwrap(), "16:00");
    }

    #[test]
    fn normalize_time_handles_the_noon_boundary() {
        assert_eq!(normalize_time("12:00 PM").unwrap(), "12:00");
        assert_eq!(normalize_time("12:30 AM").unwrap(), "00:30");
        // "09:00 AM" must sort before "01:00 PM" once normalized
        assert!(normalize_time("09:00 AM").unwrap() < normalize_time("01:00 PM").unwrap());
    }

    #[test]
    fn normalize_time_rejects_garbage() {
        assert!(normalize_time("").is_err());
        assert!(normalize_time("25:00").is_err());
        assert!(normalize_time("13:00 PM").is_err());
        assert!(normalize_time("noonish").is_err());
    }

    #[test]
    fn booking_stores_normalized_time() {
        let (conn, user_id) = setup_db();
        let id = book_appointment(&conn, user_id, &request(tomorrow(), "01:00 PM")).unwrap();

        let appt = appointment::get_appointment(&conn, id).unwrap().unwrap();
        assert_eq!(appt.time, "13:00");
        assert_eq!(appt.status, AppointmentStatus::Pending);
    }

    #[test]
    fn booking_rejects_malformed_date() {
        let (conn, user_id) = setup_db();
        let err = book_appointment(&conn, user_id, &request("07/08/2026".to_string(), "09:00"))
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidDate(_)));
    }

    #[test]
    fn booking_rejects_unknown_or_unavailable_doctor() {
        let (conn, user_id) = setup_db();

        let mut req = request(tomorrow(), "09:00");
        req.doctor_id = "doc-999".to_string();
        assert!(matches!(
            book_appointment(&conn, user_id, &req).unwrap_err(),
            BookingError::UnknownDoctor(_)
        ));

        req.doctor_id = "doc-2".to_string();
        assert!(matches!(
            book_appointment(&conn, user_id, &req).unwrap_err(),
            BookingError::DoctorUnavailable(_)
        ));
    }

    #[test]
    fn booking_rejects_oversized_notes() {
        let (conn, user_id) = setup_db();
        let mut req = request(tomorrow(), "09:00");
        req.notes = Some("x".repeat(MAX_NOTES_LEN + 1));
        assert!(matches!(
            book_appointment(&conn, user_id, &req).unwrap_err(),
            BookingError::NotesTooLong
        ));
    }

    #[test]
    fn lifecycle_happy_path() {
        let (conn, user_id) = setup_db();
        let id = book_appointment(&conn, user_id, &request(tomorrow(), "09:00")).unwrap();

        confirm_appointment(&conn, id).unwrap();
        complete_appointment(&conn, id).unwrap();

        let appt = appointment::get_appointment(&conn, id).unwrap().unwrap();
        assert_eq!(appt.status, AppointmentStatus::Completed);
    }

    #[test]
    fn lifecycle_rejects_illegal_moves() {
        let (conn, user_id) = setup_db();
        let id = book_appointment(&conn, user_id, &request(tomorrow(), "09:00")).unwrap();

        // pending → completed skips confirmation
        assert!(matches!(
            complete_appointment(&conn, id).unwrap_err(),
            BookingError::InvalidTransition { .. }
        ));

        cancel_appointment(&conn, id).unwrap();
        // cancelled is terminal
        assert!(matches!(
            confirm_appointment(&conn, id).unwrap_err(),
            BookingError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn lifecycle_missing_appointment_is_not_found() {
        let (conn, _user_id) = setup_db();
        assert!(matches!(
            confirm_appointment(&conn, 999).unwrap_err(),
            BookingError::NotFound(999)
        ));
    }

    #[test]
    fn views_join_doctor_and_specialty() {
        let (conn, user_id) = setup_db();
        let id = book_appointment(&conn, user_id, &request(tomorrow(), "10:00")).unwrap();

        let upcoming = upcoming_appointments(&conn, user_id).unwrap();
        assert_eq!(upcoming.len(), 1);
        let view = &upcoming[0];
        assert_eq!(view.id, id);
        assert_eq!(view.doctor_name, "Dr. Grace Hopper");
        assert_eq!(view.specialty, "Cardiology");
        assert_eq!(view.status, AppointmentStatus::Pending);
    }

    #[test]
    fn views_split_upcoming_and_past() {
        let (conn, user_id) = setup_db();
        let today = Local::now().date_naive();

        let upcoming_id =
            book_appointment(&conn, user_id, &request(tomorrow(), "09:00")).unwrap();
        let cancelled_id =
            book_appointment(&conn, user_id, &request(tomorrow(), "11:00")).unwrap();
        cancel_appointment(&conn, cancelled_id).unwrap();

        // Seeded through the store: already-past rows are data, not bookings
        let yesterday = today - Duration::days(1);
        let old_id = appointment::create_appointment(
            &conn, user_id, "doc-1", &yesterday, "08:00", None,
        )
        .unwrap();

        let upcoming = upcoming_appointments(&conn, user_id).unwrap();
        assert_eq!(upcoming.iter().map(|v| v.id).collect::<Vec<_>>(), vec![upcoming_id]);

        let past = past_appointments(&conn, user_id).unwrap();
        let past_ids: Vec<i64> = past.iter().map(|v| v.id).collect();
        assert_eq!(past_ids, vec![cancelled_id, old_id]);
    }
}
