//! `noticeboard` - a local bulletin board for short announcements
//!
//! This library keeps an ordered collection of announcements in memory,
//! mirrors it to a persisted blob after every change, and exposes a command
//! interface that any front end can drive.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod announcement;
pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod storage;
pub mod store;

pub use announcement::{Announcement, AnnouncementId};
pub use board::{Board, Command, Confirm, Listing, Outcome};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{BlobStore, MemoryBlobStore, SqliteBlobStore, StorageStats};
pub use store::AnnouncementStore;
