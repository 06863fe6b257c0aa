use rusqlite::{params, Connection, Row};

use crate::db::{map_sqlite_error, DatabaseError};
use crate::models::User;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        password_hash: row.get(5)?,
    })
}

/// Insert a new account row. Returns the assigned id.
///
/// A duplicate email surfaces as `DatabaseError::ConstraintViolation`;
/// any other engine failure is logged and propagated unchanged.
pub fn add_user(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    password_hash: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO users (first_name, last_name, email, phone, password_hash)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![first_name, last_name, email, phone, password_hash],
    )
    .map_err(|e| {
        tracing::error!("Failed to insert user: {e}");
        map_sqlite_error(e)
    })?;
    Ok(conn.last_insert_rowid())
}

/// Fetch a user by email. `None` when no account matches.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email, phone, password_hash
         FROM users WHERE email = ?1",
    )?;

    match stmt.query_row(params![email], user_from_row) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email, phone, password_hash
         FROM users WHERE id = ?1",
    )?;

    match stmt.query_row(params![id], user_from_row) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Full-row overwrite by id. Silent no-op when the id matches nothing.
pub fn update_user(
    conn: &Connection,
    id: i64,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    password_hash: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE users SET first_name = ?1, last_name = ?2, email = ?3, phone = ?4,
         password_hash = ?5 WHERE id = ?6",
        params![first_name, last_name, email, phone, password_hash, id],
    )
    .map_err(|e| {
        tracing::error!("Failed to update user {id}: {e}");
        map_sqlite_error(e)
    })?;
    Ok(())
}

/// Remove one account. No-op if absent. Appointments cascade.
pub fn delete_user(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(())
}

/// Unguarded bulk wipe of every account (and, via cascade, every appointment).
pub fn delete_all_users(conn: &Connection) -> Result<(), DatabaseError> {
    let removed = conn.execute("DELETE FROM users", [])?;
    tracing::warn!("Deleted all users ({removed} rows)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn setup_db() -> Connection {
        open_memory_database().expect("in-memory DB should open")
    }

    #[test]
    fn add_then_lookup_by_email() {
        let conn = setup_db();
        let id = add_user(&conn, "Ada", "Lovelace", "ada@example.com", "555-0100", "hash-a")
            .unwrap();

        let user = get_user_by_email(&conn, "ada@example.com").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.phone, "555-0100");
        assert_eq!(user.password_hash, "hash-a");
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn lookup_unknown_email_returns_none() {
        let conn = setup_db();
        assert!(get_user_by_email(&conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_constraint_violation() {
        let conn = setup_db();
        add_user(&conn, "Ada", "Lovelace", "ada@example.com", "555-0100", "hash-a").unwrap();

        let err = add_user(&conn, "Grace", "Hopper", "ada@example.com", "555-0200", "hash-b")
            .unwrap_err();
        assert!(err.is_constraint_violation(), "got {err:?}");

        // First record unchanged
        let user = get_user_by_email(&conn, "ada@example.com").unwrap().unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.password_hash, "hash-a");
    }

    #[test]
    fn update_overwrites_all_fields() {
        let conn = setup_db();
        let id = add_user(&conn, "Ada", "Lovelace", "ada@example.com", "555-0100", "hash-a")
            .unwrap();

        update_user(&conn, id, "Ada", "King", "ada.king@example.com", "555-0199", "hash-c")
            .unwrap();

        assert!(get_user_by_email(&conn, "ada@example.com").unwrap().is_none());
        let user = get_user_by_email(&conn, "ada.king@example.com").unwrap().unwrap();
        assert_eq!(user.last_name, "King");
        assert_eq!(user.phone, "555-0199");
        assert_eq!(user.password_hash, "hash-c");
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let conn = setup_db();
        let result = update_user(&conn, 999, "X", "Y", "x@example.com", "0", "h");
        assert!(result.is_ok());
    }

    #[test]
    fn delete_user_removes_row() {
        let conn = setup_db();
        let id = add_user(&conn, "Ada", "Lovelace", "ada@example.com", "555-0100", "hash-a")
            .unwrap();
        delete_user(&conn, id).unwrap();
        assert!(get_user_by_email(&conn, "ada@example.com").unwrap().is_none());

        // Deleting again is a no-op
        assert!(delete_user(&conn, id).is_ok());
    }

    #[test]
    fn delete_all_users_wipes_every_account() {
        let conn = setup_db();
        add_user(&conn, "Ada", "Lovelace", "ada@example.com", "555-0100", "h1").unwrap();
        add_user(&conn, "Grace", "Hopper", "grace@example.com", "555-0200", "h2").unwrap();

        delete_all_users(&conn).unwrap();

        assert!(get_user_by_email(&conn, "ada@example.com").unwrap().is_none());
        assert!(get_user_by_email(&conn, "grace@example.com").unwrap().is_none());
    }
}
