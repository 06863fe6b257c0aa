use rusqlite::{params, Connection, Row};

use super::{parse_timestamp, TIMESTAMP_FORMAT};
use crate::db::{map_sqlite_error, DatabaseError};
use crate::models::Specialty;

fn specialty_from_row(row: &Row<'_>) -> rusqlite::Result<Specialty> {
    Ok(Specialty {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        description: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
    })
}

/// Load a specialty row (reference-data loader).
pub fn insert_specialty(conn: &Connection, specialty: &Specialty) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO specialties (id, name, icon, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            specialty.id,
            specialty.name,
            specialty.icon,
            specialty.description,
            specialty.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

pub fn get_specialty(conn: &Connection, id: &str) -> Result<Option<Specialty>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, icon, description, created_at FROM specialties WHERE id = ?1",
    )?;

    match stmt.query_row(params![id], specialty_from_row) {
        Ok(specialty) => Ok(Some(specialty)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

pub fn list_specialties(conn: &Connection) -> Result<Vec<Specialty>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, icon, description, created_at FROM specialties ORDER BY name",
    )?;

    let rows = stmt.query_map([], specialty_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
