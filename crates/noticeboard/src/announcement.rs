//! Core announcement types for noticeboard.
//!
//! This module defines the announcement record as it is held in memory and
//! persisted, along with the validated inputs used to create and edit one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Message shown when a submitted announcement is missing a field.
pub const MISSING_FIELDS_MESSAGE: &str = "all fields are required (title, content, author)";

/// Message shown when an edit is missing its title or content.
pub const MISSING_EDIT_FIELDS_MESSAGE: &str = "all fields are required (title, content)";

/// Opaque, immutable identifier of an announcement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AnnouncementId(String);

impl AnnouncementId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// View the identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnouncementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AnnouncementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Older boards stored numeric ids; keep their textual form.
impl<'de> Deserialize<'de> for AnnouncementId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// A single bulletin record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Unique identifier, assigned on creation.
    pub id: AnnouncementId,

    /// Headline shown in listings.
    pub title: String,

    /// Body text; may contain line breaks.
    pub content: String,

    /// Who posted it. Never changes after creation.
    pub author: String,

    /// When it was created or last edited.
    pub date: DateTime<Utc>,

    /// How many times the detail view was opened.
    #[serde(default)]
    pub views: u64,
}

impl Announcement {
    /// Build a new announcement from a validated draft.
    #[must_use]
    pub fn new(draft: Draft, date: DateTime<Utc>) -> Self {
        Self {
            id: AnnouncementId::generate(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            date,
            views: 0,
        }
    }

    /// Case-insensitive substring match against the title.
    #[must_use]
    pub fn title_matches(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty() || self.title.to_lowercase().contains(needle_lowercase)
    }
}

/// Validated input for a new announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    title: String,
    content: String,
    author: String,
}

impl Draft {
    /// Trim and validate the submitted fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if any field is blank.
    pub fn new(title: &str, content: &str, author: &str) -> Result<Self> {
        let (title, content, author) = (title.trim(), content.trim(), author.trim());
        if title.is_empty() || content.is_empty() || author.is_empty() {
            return Err(Error::validation(MISSING_FIELDS_MESSAGE));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
        })
    }
}

/// Validated input for editing an existing announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub(crate) title: String,
    pub(crate) content: String,
}

impl Revision {
    /// Trim and validate the edited fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the title or content is blank.
    pub fn new(title: &str, content: &str) -> Result<Self> {
        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() || content.is_empty() {
            return Err(Error::validation(MISSING_EDIT_FIELDS_MESSAGE));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}
