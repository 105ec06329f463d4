use std::path::Path;

use rusqlite::{params, Connection};
use tracing::info;

use crate::errors::{LoaderError, Result};
use crate::types::MountainRecord;

use super::MountainSink;

/// The embedded SQL schema applied when the sink is opened.
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Relational writer: one row per record in the `mountains` table.
///
/// Rows are never deduplicated; loading the same URI twice yields two rows.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens (or creates) the database at `db_path`, creating parent
    /// directories if needed, and applies the schema.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LoaderError::Sink {
                message: format!("failed to create database directory: {e}"),
                sink: "sqlite".to_string(),
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| LoaderError::Sink {
            message: format!("failed to open database: {e}"),
            sink: "sqlite".to_string(),
        })?;

        Self::apply_pragmas(&conn)?;

        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| LoaderError::Sink {
                message: format!("failed to apply schema: {e}"),
                sink: "sqlite".to_string(),
            })?;

        Ok(Self { conn })
    }

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Number of stored rows.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM mountains", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn apply_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 120000;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| LoaderError::Sink {
            message: format!("failed to apply pragmas: {e}"),
            sink: "sqlite".to_string(),
        })
    }
}

impl MountainSink for SqliteSink {
    fn insert_mountain(&mut self, record: &MountainRecord) -> Result<()> {
        info!("Inserting via SQLite: {}", record.uri);
        let location = &record.location;
        self.conn
            .execute(
                "INSERT INTO mountains
                 (source, name, longitude, latitude, elevation, wikipedia_link, abstract)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.uri,
                    record.name,
                    location.longitude.unwrap_or(0.0),
                    location.latitude.unwrap_or(0.0),
                    location.elevation.unwrap_or(0.0),
                    record.wikipedia_link,
                    record.abstract_text,
                ],
            )
            .map_err(|e| LoaderError::Sink {
                message: format!("failed to insert {}: {e}", record.uri),
                sink: "sqlite".to_string(),
            })?;
        Ok(())
    }
}
