//! `SQLite` schema for the blob database.
//!
//! The database holds one `blobs` table plus a `metadata` table recording the
//! schema version the file was written with. Opening a file stamped by a
//! newer release is refused rather than risking a silent overwrite.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

/// Schema version written into new databases.
pub const SCHEMA_VERSION: i32 = 1;

/// Metadata key holding the schema version.
const VERSION_KEY: &str = "schema_version";

/// SQL statement to create the blobs table.
pub const CREATE_BLOBS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS blobs (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_BLOBS_TABLE, CREATE_METADATA_TABLE];

/// Create the tables if needed and check the stored schema version.
///
/// # Errors
///
/// Returns an error if the tables cannot be created, or the file carries an
/// unreadable or newer schema version.
pub fn initialize(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match stored_version(conn)? {
        Some(version) if version > SCHEMA_VERSION => Err(Error::DatabaseSchema {
            message: format!(
                "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
            ),
        }),
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        _ => {
            conn.execute(
                "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
                (VERSION_KEY, SCHEMA_VERSION.to_string()),
            )?;
            Ok(())
        }
    }
}

fn stored_version(conn: &Connection) -> Result<Option<i32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|v| {
            v.parse().map_err(|_| Error::DatabaseSchema {
                message: format!("invalid schema version: {v}"),
            })
        })
        .transpose()
}
