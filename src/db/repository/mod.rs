pub mod appointment;
pub mod doctor;
pub mod specialty;
pub mod user;

use chrono::{NaiveDate, NaiveDateTime};

/// Column format for created_at/updated_at. Millisecond precision so an
/// update sorts strictly after the row's creation.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Lenient timestamp parse for row mapping. Rows written by this crate (or
/// by SQLite's strftime defaults) always match; anything else falls back to
/// the epoch rather than failing the whole query.
pub(crate) fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .unwrap_or_default()
}

pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}
