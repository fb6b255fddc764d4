//! The announcement store.
//!
//! [`AnnouncementStore`] owns the authoritative in-memory collection and
//! mirrors it to a [`BlobStore`] after every mutation. The whole collection is
//! rewritten on each save, so cost grows linearly with the number of
//! announcements.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::announcement::{Announcement, AnnouncementId, Draft, Revision};
use crate::error::Result;
use crate::storage::BlobStore;

/// Default key the board is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "announcements";

/// Suffix of the key an unreadable blob is copied to before it is replaced.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Source of the current time.
pub trait Clock: std::fmt::Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// In-memory collection of announcements, newest first, mirrored to a blob.
#[derive(Debug)]
pub struct AnnouncementStore {
    backend: Box<dyn BlobStore>,
    key: String,
    clock: Box<dyn Clock>,
    items: Vec<Announcement>,
    /// Raw blob that failed to parse on load, kept until it is backed up.
    unreadable: Option<String>,
}

impl AnnouncementStore {
    /// Open the store, loading whatever is persisted under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read. A blob that cannot be
    /// parsed is not an error; the store starts empty instead.
    pub fn open(backend: Box<dyn BlobStore>, key: impl Into<String>) -> Result<Self> {
        Self::with_clock(backend, key, Box::new(SystemClock))
    }

    /// Open the store with a custom time source.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn with_clock(
        backend: Box<dyn BlobStore>,
        key: impl Into<String>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let mut store = Self {
            backend,
            key: key.into(),
            clock,
            items: Vec::new(),
            unreadable: None,
        };
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// An absent blob yields an empty collection. A malformed blob is treated
    /// as absent; its raw text is copied aside on the next save.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load(&mut self) -> Result<()> {
        self.items = match self.backend.get(&self.key)? {
            None => {
                debug!("No board stored under {}, starting empty", self.key);
                Vec::new()
            }
            Some(raw) => match serde_json::from_str::<Vec<Announcement>>(&raw) {
                Ok(items) => {
                    debug!("Loaded {} announcements from {}", items.len(), self.key);
                    self.unreadable = None;
                    dedup_ids(items)
                }
                Err(err) => {
                    warn!(
                        "Stored board under {} is unreadable ({}), starting empty",
                        self.key, err
                    );
                    self.unreadable = Some(raw);
                    Vec::new()
                }
            },
        };
        self.sort();
        Ok(())
    }

    /// Serialize the whole collection and overwrite the persisted blob.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save(&mut self) -> Result<()> {
        if let Some(raw) = self.unreadable.as_deref() {
            let backup_key = format!("{}{CORRUPT_SUFFIX}", self.key);
            warn!("Backing up unreadable board to {}", backup_key);
            self.backend.put(&backup_key, raw)?;
            self.unreadable = None;
        }
        let blob = serde_json::to_string(&self.items)?;
        self.backend.put(&self.key, &blob)?;
        debug!("Saved {} announcements to {}", self.items.len(), self.key);
        Ok(())
    }

    /// Add a new announcement and persist.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if any field is blank, or a storage
    /// error if persisting fails. Either way the store is left untouched.
    pub fn create(&mut self, title: &str, content: &str, author: &str) -> Result<Announcement> {
        let draft = Draft::new(title, content, author)?;
        let announcement = Announcement::new(draft, self.clock.now());
        let previous = self.items.clone();

        // Ties on date keep the newest entry first.
        self.items.insert(0, announcement.clone());
        self.sort();
        self.commit(previous)?;
        info!("Created announcement {}", announcement.id);
        Ok(announcement)
    }

    /// Edit the title and content of an announcement and persist.
    ///
    /// Returns `None` without touching anything if `id` is unknown. The date
    /// is refreshed and never moves backwards.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if the title or content is blank,
    /// or a storage error if persisting fails.
    pub fn update(
        &mut self,
        id: &AnnouncementId,
        title: &str,
        content: &str,
    ) -> Result<Option<Announcement>> {
        let revision = Revision::new(title, content)?;
        let now = self.clock.now();

        let Some(index) = self.items.iter().position(|a| &a.id == id) else {
            debug!("Update of unknown announcement {} ignored", id);
            return Ok(None);
        };
        let previous = self.items.clone();
        let existing = &mut self.items[index];
        existing.title = revision.title;
        existing.content = revision.content;
        existing.date = existing.date.max(now);
        let updated = existing.clone();

        self.sort();
        self.commit(previous)?;
        info!("Updated announcement {}", id);
        Ok(Some(updated))
    }

    /// Remove an announcement and persist.
    ///
    /// Returns `false` if `id` is unknown, in which case nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn delete(&mut self, id: &AnnouncementId) -> Result<bool> {
        let Some(index) = self.items.iter().position(|a| &a.id == id) else {
            debug!("Delete of unknown announcement {} ignored", id);
            return Ok(false);
        };
        let previous = self.items.clone();
        self.items.remove(index);
        self.commit(previous)?;
        info!("Deleted announcement {}", id);
        Ok(true)
    }

    /// Count one view of an announcement and persist.
    ///
    /// Returns the updated record, or `None` if `id` is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn record_view(&mut self, id: &AnnouncementId) -> Result<Option<Announcement>> {
        let Some(index) = self.items.iter().position(|a| &a.id == id) else {
            debug!("View of unknown announcement {} ignored", id);
            return Ok(None);
        };
        let previous = self.items.clone();
        let existing = &mut self.items[index];
        existing.views = existing.views.saturating_add(1);
        let viewed = existing.clone();
        self.commit(previous)?;
        Ok(Some(viewed))
    }

    /// Announcements whose title contains `term`, ignoring case, in store order.
    ///
    /// An empty term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Announcement> {
        let needle = term.to_lowercase();
        let matches: Vec<Announcement> = self
            .items
            .iter()
            .filter(|a| a.title_matches(&needle))
            .cloned()
            .collect();
        debug!("Search {:?} matched {} of {}", term, matches.len(), self.items.len());
        matches
    }

    /// Look up an announcement without counting a view.
    #[must_use]
    pub fn get(&self, id: &AnnouncementId) -> Option<&Announcement> {
        self.items.iter().find(|a| &a.id == id)
    }

    /// All announcements, newest first.
    #[must_use]
    pub fn all(&self) -> &[Announcement] {
        &self.items
    }

    /// Number of announcements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the board holds no announcements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Key the collection is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist a mutation, rolling the collection back to `previous` if the
    /// write fails so memory never holds a change that was reported lost.
    fn commit(&mut self, previous: Vec<Announcement>) -> Result<()> {
        if let Err(err) = self.save() {
            warn!("Save to {} failed, discarding the change: {}", self.key, err);
            self.items = previous;
            return Err(err);
        }
        Ok(())
    }

    fn sort(&mut self) {
        self.items.sort_by(|a, b| b.date.cmp(&a.date));
    }
}

fn dedup_ids(items: Vec<Announcement>) -> Vec<Announcement> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|a| {
            let fresh = seen.insert(a.id.clone());
            if !fresh {
                warn!("Dropping duplicate announcement id {}", a.id);
            }
            fresh
        })
        .collect()
}
