use super::migrations::run_migrations;
use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::error::ClipError;
use crate::domain::ports::feature_repository::FeatureRepository;
use crate::domain::values::feature_key::FeatureKey;
use crate::domain::values::feature_vector::FeatureVector;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

/// Write-through feature table. Every `put`/`delete` commits before returning.
pub struct SqliteFeatureRepo {
    conn: Mutex<Connection>,
    dimension: usize,
    label: String,
}

impl SqliteFeatureRepo {
    /// Opens (or creates) the database at `path`; `":memory:"` gives a private in-memory database.
    pub fn open(path: &str, dimension: usize) -> Result<Self, ClipError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| ClipError::Storage(format!("WAL error: {e}")))?;
        Self::with_connection(conn, dimension, format!("sqlite:{path}"))
    }

    pub fn with_connection(conn: Connection, dimension: usize, label: String) -> Result<Self, ClipError> {
        run_migrations(&conn)?;

        let stored: Option<String> = conn
            .query_row("SELECT value FROM meta WHERE name = 'dimension'", [], |r| r.get(0))
            .optional()?;
        match stored {
            Some(v) => {
                let stored_dim: usize = v
                    .parse()
                    .map_err(|_| ClipError::Storage(format!("bad stored dimension '{v}'")))?;
                if stored_dim != dimension {
                    return Err(ClipError::Storage(format!(
                        "database dimension {stored_dim} does not match model dimension {dimension}"
                    )));
                }
            }
            None => {
                conn.execute(
                    "INSERT INTO meta (name, value) VALUES ('dimension', ?1)",
                    params![dimension.to_string()],
                )?;
            }
        }

        Ok(Self { conn: Mutex::new(conn), dimension, label })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ClipError> {
        self.conn.lock().map_err(|e| ClipError::Storage(e.to_string()))
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }
}

impl FeatureRepository for SqliteFeatureRepo {
    fn load(&self) -> Result<Vec<FeatureEntry>, ClipError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, vector FROM features ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((key, blob))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (key, blob) = row?;
            if blob.len() != self.dimension * 4 {
                return Err(ClipError::Storage(format!(
                    "row {key} holds {} bytes, expected {}",
                    blob.len(),
                    self.dimension * 4
                )));
            }
            let key = FeatureKey::new(key).map_err(|e| ClipError::Storage(format!("bad stored key: {e}")))?;
            let vector = FeatureVector::new(Self::deserialize_vector(&blob))
                .map_err(|e| ClipError::Storage(format!("bad stored vector for {key}: {e}")))?;
            entries.push(FeatureEntry::new(key, vector));
        }
        Ok(entries)
    }

    fn put(&self, entry: &FeatureEntry) -> Result<(), ClipError> {
        let conn = self.lock()?;
        let blob = Self::serialize_vector(entry.vector.as_slice());
        // ON CONFLICT keeps the original seq, so replaced keys keep their rank among ties
        conn.execute(
            "INSERT INTO features (key, vector) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET vector = excluded.vector",
            params![entry.key.as_str(), blob],
        ).map_err(|e| ClipError::Storage(format!("Failed to store vector: {e}")))?;
        Ok(())
    }

    fn delete(&self, key: &FeatureKey) -> Result<(), ClipError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM features WHERE key = ?1", params![key.as_str()])
            .map_err(|e| ClipError::Storage(format!("Failed to delete vector: {e}")))?;
        Ok(())
    }

    fn flush(&self, _entries: &[FeatureEntry]) -> Result<(), ClipError> {
        let conn = self.lock()?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
