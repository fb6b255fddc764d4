//! Command interface between the announcement store and a front end.
//!
//! A [`Board`] owns the store plus the current search term. Every command
//! returns the refreshed, filtered [`Listing`] so the presentation layer never
//! has to re-derive it.

use serde::Serialize;
use tracing::debug;

use crate::announcement::{Announcement, AnnouncementId};
use crate::error::{Error, Result};
use crate::store::AnnouncementStore;

/// Question asked before an announcement is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this announcement?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Return `true` if the user agreed to `prompt`.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Confirmation that always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Something the user asked the board to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Post a new announcement.
    Create {
        /// Headline.
        title: String,
        /// Body text.
        content: String,
        /// Poster.
        author: String,
    },
    /// Edit an existing announcement.
    Update {
        /// Which announcement.
        id: AnnouncementId,
        /// New headline.
        title: String,
        /// New body text.
        content: String,
    },
    /// Remove an announcement after confirmation.
    Delete {
        /// Which announcement.
        id: AnnouncementId,
    },
    /// Open an announcement, counting a view.
    View {
        /// Which announcement.
        id: AnnouncementId,
    },
    /// Change the search term filtering the listing.
    Search {
        /// Case-insensitive title filter; empty shows everything.
        term: String,
    },
}

/// Filtered view of the board plus its overall size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Search term the items were filtered with.
    pub term: String,
    /// Matching announcements, newest first.
    pub items: Vec<Announcement>,
    /// Number of announcements on the whole board.
    pub total: usize,
}

impl Listing {
    /// The filter matched nothing although the board is not empty.
    #[must_use]
    pub fn no_matches(&self) -> bool {
        self.items.is_empty() && self.total > 0
    }
}

/// Result of executing a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Record affected by the command, when one was found.
    pub affected: Option<Announcement>,
    /// Listing after the command ran.
    pub listing: Listing,
}

/// Store plus the presentation state around it.
#[derive(Debug)]
pub struct Board {
    store: AnnouncementStore,
    term: String,
}

impl Board {
    /// Wrap an opened store with an empty search term.
    #[must_use]
    pub fn new(store: AnnouncementStore) -> Self {
        Self {
            store,
            term: String::new(),
        }
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank fields, [`Error::Cancelled`]
    /// when a delete is not confirmed, or a storage error if persisting fails.
    /// Unknown ids are not errors; `affected` is `None` instead.
    pub fn execute(&mut self, command: Command, confirm: &mut dyn Confirm) -> Result<Outcome> {
        debug!("Executing {:?}", command);
        let affected = match command {
            Command::Create {
                title,
                content,
                author,
            } => Some(self.store.create(&title, &content, &author)?),
            Command::Update { id, title, content } => self.store.update(&id, &title, &content)?,
            Command::Delete { id } => match self.store.get(&id).cloned() {
                None => {
                    debug!("Delete of unknown announcement {} needs no confirmation", id);
                    None
                }
                Some(target) => {
                    if !confirm.confirm(DELETE_PROMPT) {
                        return Err(Error::cancelled(format!("delete announcement {id}")));
                    }
                    self.store.delete(&id)?;
                    Some(target)
                }
            },
            Command::View { id } => self.store.record_view(&id)?,
            Command::Search { term } => {
                self.term = term;
                None
            }
        };
        Ok(Outcome {
            affected,
            listing: self.listing(),
        })
    }

    /// Current filtered listing.
    #[must_use]
    pub fn listing(&self) -> Listing {
        Listing {
            term: self.term.clone(),
            items: self.store.search(&self.term),
            total: self.store.len(),
        }
    }

    /// Current search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &AnnouncementStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{ManualClock, SharedBlobStore};
    use crate::store::DEFAULT_STORAGE_KEY;

    /// Records prompts and answers from a fixed script.
    #[derive(Debug, Default)]
    struct ScriptedConfirm {
        answers: Vec<bool>,
        prompts: Vec<String>,
    }

    impl Confirm for ScriptedConfirm {
        fn confirm(&mut self, prompt: &str) -> bool {
            self.prompts.push(prompt.to_string());
            self.answers.pop().unwrap_or(false)
        }
    }

    fn open_board(clock: &ManualClock) -> Board {
        let store = AnnouncementStore::with_clock(
            Box::new(SharedBlobStore::default()),
            DEFAULT_STORAGE_KEY,
            Box::new(clock.clone()),
        )
        .unwrap();
        Board::new(store)
    }

    fn create(title: &str, content: &str, author: &str) -> Command {
        Command::Create {
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
        }
    }

    fn titles(listing: &Listing) -> Vec<&str> {
        listing.items.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_scenario_create_delete_view() {
        let clock = ManualClock::new();
        let mut board = open_board(&clock);
        let mut yes = AutoConfirm(true);

        let a = board
            .execute(create("A", "x", "bob"), &mut yes)
            .unwrap()
            .affected
            .unwrap();
        clock.advance(1);
        let out = board.execute(create("B", "y", "sue"), &mut yes).unwrap();
        let b = out.affected.unwrap();
        assert_eq!(titles(&out.listing), vec!["B", "A"]);

        let out = board
            .execute(Command::Delete { id: a.id.clone() }, &mut yes)
            .unwrap();
        assert_eq!(titles(&out.listing), vec!["B"]);
        assert_eq!(out.listing.total, 1);

        board
            .execute(Command::View { id: b.id.clone() }, &mut yes)
            .unwrap();
        let out = board
            .execute(Command::View { id: b.id.clone() }, &mut yes)
            .unwrap();
        assert_eq!(out.affected.unwrap().views, 2);
        assert_eq!(out.listing.items[0].views, 2);
    }

    #[test]
    fn test_declined_delete_changes_nothing() {
        let mut board = open_board(&ManualClock::new());
        let a = board
            .execute(create("A", "x", "bob"), &mut AutoConfirm(true))
            .unwrap()
            .affected
            .unwrap();

        let mut confirm = ScriptedConfirm::default();
        let err = board
            .execute(Command::Delete { id: a.id.clone() }, &mut confirm)
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(confirm.prompts, vec![DELETE_PROMPT.to_string()]);
        assert_eq!(board.listing().total, 1);
    }

    #[test]
    fn test_delete_unknown_id_is_silent() {
        let mut board = open_board(&ManualClock::new());
        let mut confirm = ScriptedConfirm::default();
        let out = board
            .execute(
                Command::Delete {
                    id: AnnouncementId::from("ghost"),
                },
                &mut confirm,
            )
            .unwrap();
        assert!(out.affected.is_none());
        assert_eq!(out.listing.total, 0);
        assert!(confirm.prompts.is_empty());
    }

    #[test]
    fn test_search_term_sticks_across_mutations() {
        let clock = ManualClock::new();
        let mut board = open_board(&clock);
        let mut yes = AutoConfirm(true);
        board.execute(create("Drill schedule", "x", "a"), &mut yes).unwrap();
        clock.advance(1);
        board.execute(create("Menu", "x", "b"), &mut yes).unwrap();

        let out = board
            .execute(
                Command::Search {
                    term: "DRILL".to_string(),
                },
                &mut yes,
            )
            .unwrap();
        assert_eq!(titles(&out.listing), vec!["Drill schedule"]);
        assert_eq!(out.listing.total, 2);
        assert_eq!(board.term(), "DRILL");

        clock.advance(1);
        let out = board.execute(create("Night drill", "x", "c"), &mut yes).unwrap();
        assert_eq!(titles(&out.listing), vec!["Night drill", "Drill schedule"]);
        assert_eq!(out.listing.total, 3);
    }

    #[test]
    fn test_no_matches_only_when_board_not_empty() {
        let mut board = open_board(&ManualClock::new());
        let mut yes = AutoConfirm(true);
        let search = Command::Search {
            term: "zzz".to_string(),
        };

        let out = board.execute(search.clone(), &mut yes).unwrap();
        assert!(!out.listing.no_matches());

        let out = board.execute(create("A", "x", "bob"), &mut yes).unwrap();
        assert!(out.listing.no_matches());
    }

    #[test]
    fn test_validation_error_surfaces() {
        let mut board = open_board(&ManualClock::new());
        let err = board
            .execute(create("", "x", "bob"), &mut AutoConfirm(true))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(board.store().len(), 0);
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let mut board = open_board(&ManualClock::new());
        let out = board
            .execute(
                Command::Update {
                    id: AnnouncementId::from("ghost"),
                    title: "t".to_string(),
                    content: "c".to_string(),
                },
                &mut AutoConfirm(true),
            )
            .unwrap();
        assert!(out.affected.is_none());
    }
}
