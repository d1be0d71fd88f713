mod comments;
mod posts;
mod reactions;
mod users;
mod votes;

use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use uuid::Uuid;

/// Timestamps are kept at millisecond precision so a record read back
/// compares equal to the one returned at insert.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Read a text column holding a hyphenated UUID.
fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    parse_at(row, idx)
}

/// Read a text column and parse it, surfacing bad data as a conversion failure.
fn parse_at<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// `table` is always one of our own table names, never user input.
fn record_exists(conn: &Connection, table: &'static str, id: &Uuid) -> rusqlite::Result<bool> {
    conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
        [id.to_string()],
        |row| row.get(0),
    )
}
