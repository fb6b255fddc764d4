//! Command-line interface for noticeboard.
//!
//! This module provides the CLI structure for the `nboard` binary and the
//! stdin-backed delete confirmation.

mod commands;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::board::Confirm;
use crate::logging::Verbosity;

pub use commands::{
    unescape_newlines, ConfigCommand, DeleteCommand, EditCommand, ListCommand, OutputFormat,
    PostCommand, ShowCommand, StatusCommand,
};

/// nboard - A local bulletin board
///
/// Post, list, search, read, edit and delete short announcements kept in a
/// local database.
#[derive(Debug, Parser)]
#[command(name = "nboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (command output is still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Post a new announcement
    Post(PostCommand),

    /// List announcements, newest first
    List(ListCommand),

    /// Read an announcement (counts a view)
    Show(ShowCommand),

    /// Edit an announcement's title and content
    Edit(EditCommand),

    /// Delete an announcement
    Delete(DeleteCommand),

    /// Show board and database status
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Asks a yes/no question on a terminal-like pair of streams.
#[derive(Debug)]
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    /// Prompt on `output`, read the answer from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [y/N] ").is_err() || self.output.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "nboard");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["nboard", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);

        let cli = Cli::try_parse_from(["nboard", "-q", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_quiet_help_describes_logging() {
        let command = Cli::command();
        let quiet = command
            .get_arguments()
            .find(|arg| arg.get_id() == "quiet")
            .unwrap();
        let help = quiet.get_help().unwrap().to_string();
        assert!(help.contains("log"), "{help}");
        assert!(!help.contains("Suppress all output"), "{help}");
    }

    #[test]
    fn test_parse_post() {
        let cli = Cli::try_parse_from([
            "nboard", "post", "-t", "Drill", "-b", "At 0900", "-a", "kim",
        ])
        .unwrap();
        let Command::Post(post) = cli.command else {
            panic!("expected post");
        };
        assert_eq!(post.title, "Drill");
        assert_eq!(post.content, "At 0900");
        assert_eq!(post.author, "kim");
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["nboard", "list"]).unwrap();
        let Command::List(list) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(list.search, "");
        assert_eq!(list.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_list_with_search_and_format() {
        let cli = Cli::try_parse_from(["nboard", "list", "-s", "drill", "-f", "json"]).unwrap();
        let Command::List(list) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(list.search, "drill");
        assert_eq!(list.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_delete_yes() {
        let cli = Cli::try_parse_from(["nboard", "delete", "abc", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Delete(DeleteCommand { yes: true, .. })));
    }

    #[test]
    fn test_parse_edit_requires_fields() {
        assert!(Cli::try_parse_from(["nboard", "edit", "abc", "-t", "x"]).is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["nboard", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_prompt_confirm_answers() {
        for (input, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("", false)] {
            let mut output = Vec::new();
            let mut prompt = PromptConfirm::new(input.as_bytes(), &mut output);
            assert_eq!(prompt.confirm("Delete?"), expected, "input {input:?}");
            assert_eq!(String::from_utf8(output).unwrap(), "Delete? [y/N] ");
        }
    }
}
