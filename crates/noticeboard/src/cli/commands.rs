//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

pub use crate::render::OutputFormat;

/// Post command arguments.
#[derive(Debug, Args)]
pub struct PostCommand {
    /// Announcement title
    #[arg(short, long)]
    pub title: String,

    /// Announcement body (`\n` starts a new line)
    #[arg(short = 'b', long)]
    pub content: String,

    /// Who is posting
    #[arg(short, long)]
    pub author: String,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show announcements whose title contains this text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Announcement id
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Announcement id
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: String,

    /// New body (`\n` starts a new line)
    #[arg(short = 'b', long)]
    pub content: String,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Announcement id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Turn literal `\n` escapes typed on the command line into line breaks.
#[must_use]
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
