//! Storage layer for noticeboard.
//!
//! The board is persisted as an opaque text blob under a single key. This
//! module defines the [`BlobStore`] seam and its two implementations: a
//! `SQLite`-backed store for real use and an in-memory one for tests and
//! throwaway sessions.

pub mod schema;
mod sqlite;

use std::collections::HashMap;

use crate::error::Result;

pub use sqlite::{SqliteBlobStore, StorageStats};

/// A key-value store holding whole text blobs.
///
/// Writes replace the previous value wholesale; there is no partial update.
pub trait BlobStore: std::fmt::Debug {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be written.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Blob store kept entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one blob.
    #[must_use]
    pub fn with_blob(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.blobs.insert(key.to_string(), value.to_string());
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: BlobStore + ?Sized> BlobStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }
}
