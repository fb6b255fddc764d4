use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{schema, BlobStore};
use crate::error::{Error, Result};

/// Blob store backed by a `SQLite` database file.
#[derive(Debug)]
pub struct SqliteBlobStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteBlobStore {
    /// Open or create a blob database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::initialize(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the database file
    /// cannot be inspected.
    pub fn stats(&self) -> Result<StorageStats> {
        let (blob_count, payload_bytes): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) FROM blobs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let last_write: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM blobs ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path)?.len()
        };

        Ok(StorageStats {
            blob_count: u64::try_from(blob_count).unwrap_or(0),
            payload_bytes: u64::try_from(payload_bytes).unwrap_or(0),
            last_write,
            db_size_bytes,
        })
    }
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!("Wrote {} bytes under key {}", value.len(), key);
        Ok(())
    }
}

/// Statistics about the blob database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored blobs.
    pub blob_count: u64,
    /// Total size of all blob values in bytes.
    pub payload_bytes: u64,
    /// `SQLite` timestamp of the most recent write, if any.
    pub last_write: Option<String>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteBlobStore {
        SqliteBlobStore::open_in_memory().expect("failed to create test storage")
    }

    fn remove_db(path: &Path) {
        let _ = std::fs::remove_file(path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_in_memory() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_get_missing_key() {
        let store = create_test_store();
        assert!(store.get("announcements").unwrap().is_none());
    }

    #[test]
    fn test_put_and_get() {
        let mut store = create_test_store();
        store.put("announcements", "[]").unwrap();
        assert_eq!(store.get("announcements").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = create_test_store();
        store.put("k", "one").unwrap();
        store.put("k", "two").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.stats().unwrap().blob_count, 1);
    }

    #[test]
    fn test_unicode_value() {
        let mut store = create_test_store();
        store.put("k", "훈련 공지 🌍").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("훈련 공지 🌍"));
    }

    #[test]
    fn test_stats_empty() {
        let store = create_test_store();
        let stats = store.stats().unwrap();

        assert_eq!(stats.blob_count, 0);
        assert_eq!(stats.payload_bytes, 0);
        assert!(stats.last_write.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let mut store = create_test_store();
        store.put("a", "12345").unwrap();
        store.put("b", "678").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.blob_count, 2);
        assert_eq!(stats.payload_bytes, 8);
        assert!(stats.last_write.is_some());
    }

    #[test]
    fn test_open_file_based_persists() {
        let db_path = std::env::temp_dir().join(format!(
            "noticeboard_blob_test_{}.db",
            std::process::id()
        ));

        {
            let mut store = SqliteBlobStore::open(&db_path).unwrap();
            store.put("announcements", r#"[{"x":1}]"#).unwrap();
            assert_eq!(store.path(), db_path);
        }

        let store = SqliteBlobStore::open(&db_path).unwrap();
        assert_eq!(
            store.get("announcements").unwrap().as_deref(),
            Some(r#"[{"x":1}]"#)
        );
        assert!(store.stats().unwrap().db_size_bytes > 0);

        drop(store);
        remove_db(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("noticeboard_test_{}", std::process::id()));
        let nested_path = root.join("nested/board.db");
        let _ = std::fs::remove_dir_all(&root);

        let store = SqliteBlobStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_open_rejects_newer_schema() {
        let db_path = std::env::temp_dir().join(format!(
            "noticeboard_newer_schema_test_{}.db",
            std::process::id()
        ));
        remove_db(&db_path);

        drop(SqliteBlobStore::open(&db_path).unwrap());
        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute(
                "UPDATE metadata SET value = ?1 WHERE key = 'schema_version'",
                [(schema::SCHEMA_VERSION + 1).to_string()],
            )
            .unwrap();
        }

        let err = SqliteBlobStore::open(&db_path).unwrap_err();
        assert!(matches!(err, Error::DatabaseSchema { .. }));

        remove_db(&db_path);
    }

    #[test]
    fn test_stats_reports_missing_file() {
        let db_path = std::env::temp_dir().join(format!(
            "noticeboard_vanished_test_{}.db",
            std::process::id()
        ));
        remove_db(&db_path);

        let store = SqliteBlobStore::open(&db_path).unwrap();
        remove_db(&db_path);

        assert!(matches!(store.stats(), Err(Error::Io(_))));
    }
}
