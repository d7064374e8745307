use crate::domain::error::ClipError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), ClipError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS features (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            vector BLOB NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meta (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "
    ).map_err(|e| ClipError::Storage(format!("Migration failed: {e}")))
}
