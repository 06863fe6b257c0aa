use rusqlite::{params, Connection, Row};

use super::{parse_timestamp, TIMESTAMP_FORMAT};
use crate::db::{map_sqlite_error, DatabaseError};
use crate::models::Doctor;

const SELECT_COLUMNS: &str = "id, first_name, last_name, title, bio, avatar_url, specialty_id,
    rating, reviews_count, is_available, created_at, updated_at";

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        title: row.get(3)?,
        bio: row.get(4)?,
        avatar_url: row.get(5)?,
        specialty_id: row.get(6)?,
        rating: row.get(7)?,
        reviews_count: row.get(8)?,
        is_available: row.get::<_, i64>(9)? != 0,
        created_at: parse_timestamp(&row.get::<_, String>(10)?),
        updated_at: parse_timestamp(&row.get::<_, String>(11)?),
    })
}

/// Load a provider row. Used by seeding and tests; the app itself never
/// mutates doctors.
pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, first_name, last_name, title, bio, avatar_url,
         specialty_id, rating, reviews_count, is_available, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            doctor.id,
            doctor.first_name,
            doctor.last_name,
            doctor.title,
            doctor.bio,
            doctor.avatar_url,
            doctor.specialty_id,
            doctor.rating,
            doctor.reviews_count,
            doctor.is_available as i64,
            doctor.created_at.format(TIMESTAMP_FORMAT).to_string(),
            doctor.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &str) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM doctors WHERE id = ?1"))?;

    match stmt.query_row(params![id], doctor_from_row) {
        Ok(doctor) => Ok(Some(doctor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// All providers, name-ordered for the browse screens.
pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM doctors ORDER BY last_name, first_name"
    ))?;

    let rows = stmt.query_map([], doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_doctors_by_specialty(
    conn: &Connection,
    specialty_id: &str,
) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM doctors
         WHERE specialty_id = ?1 ORDER BY last_name, first_name"
    ))?;

    let rows = stmt.query_map(params![specialty_id], doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
