use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};

use super::{parse_date, parse_timestamp};
use crate::db::{map_sqlite_error, DatabaseError};
use crate::models::{Appointment, AppointmentStatus};

/// Raw appointment row before status/date conversion.
type RawRow = (i64, i64, String, String, String, String, String, String, String);

const SELECT_COLUMNS: &str =
    "id, user_id, doctor_id, date, time, status, notes, created_at, updated_at";

fn rows_to_vec(
    rows: impl Iterator<Item = rusqlite::Result<RawRow>>,
) -> Result<Vec<Appointment>, DatabaseError> {
    rows.map(|r| r.map_err(DatabaseError::from).and_then(raw_to_appointment))
        .collect()
}

fn raw_to_appointment(raw: RawRow) -> Result<Appointment, DatabaseError> {
    let (id, user_id, doctor_id, date, time, status, notes, created_at, updated_at) = raw;
    Ok(Appointment {
        id,
        user_id,
        doctor_id,
        date: parse_date(&date),
        time,
        status: AppointmentStatus::from_str(&status)?,
        notes,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

fn map_raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

/// Insert a booking. Status is always `pending` regardless of inputs;
/// transitions happen only through explicit status updates. Returns the
/// newly assigned id.
pub fn create_appointment(
    conn: &Connection,
    user_id: i64,
    doctor_id: &str,
    date: &NaiveDate,
    time: &str,
    notes: Option<&str>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (user_id, doctor_id, date, time, status, notes)
         VALUES (?1, ?2, ?3, ?4, 'pending', ?5)",
        params![user_id, doctor_id, date.to_string(), time, notes.unwrap_or("")],
    )
    .map_err(|e| {
        tracing::error!("Failed to insert appointment: {e}");
        map_sqlite_error(e)
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM appointments WHERE id = ?1"
    ))?;

    match stmt.query_row(params![id], map_raw_row) {
        Ok(raw) => raw_to_appointment(raw).map(Some),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Upcoming view: date today-or-later AND status still open
/// (pending/confirmed), soonest first. Times are 24-hour zero-padded, so
/// the lexicographic time ordering is chronological.
pub fn get_upcoming_appointments(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<Appointment>, DatabaseError> {
    let today = Local::now().date_naive();
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM appointments
         WHERE user_id = ?1
           AND date >= ?2
           AND status IN ('pending', 'confirmed')
         ORDER BY date, time"
    ))?;

    let rows = stmt.query_map(params![user_id, today.to_string()], map_raw_row)?;
    rows_to_vec(rows)
}

/// Past view, as its own query rather than a client-side filter of the
/// upcoming fetch: anything settled (completed/cancelled) or already
/// behind us, most recent first.
pub fn get_past_appointments(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<Appointment>, DatabaseError> {
    let today = Local::now().date_naive();
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM appointments
         WHERE user_id = ?1
           AND (status IN ('completed', 'cancelled') OR date < ?2)
         ORDER BY date DESC, time DESC"
    ))?;

    let rows = stmt.query_map(params![user_id, today.to_string()], map_raw_row)?;
    rows_to_vec(rows)
}

/// Set the status and refresh `updated_at`. Accepts any of the four values
/// with no transition check; the guarded lifecycle lives in the booking
/// facade. No-op when the id matches nothing.
pub fn update_appointment_status(
    conn: &Connection,
    id: i64,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE appointments
         SET status = ?1, updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
         WHERE id = ?2",
        params![status.as_str(), id],
    )
    .map_err(|e| {
        tracing::error!("Failed to update appointment {id} status: {e}");
        map_sqlite_error(e)
    })?;
    Ok(())
}

/// Remove one booking. No-op if absent.
pub fn delete_appointment(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(())
}
