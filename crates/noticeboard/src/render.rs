//! Text rendering of listings and announcement details.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;

use crate::announcement::Announcement;
use crate::board::Listing;
use crate::config::DisplayConfig;
use crate::error::Result;

/// Shown when a search filters out every announcement.
pub const NO_MATCHES_MESSAGE: &str = "No announcements match the search.";

/// Number of id characters shown in table output.
const SHORT_ID_LEN: usize = 8;

/// How listings and details are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

/// Formats announcement dates for display.
#[derive(Debug, Clone)]
pub struct DateDisplay {
    format: String,
    local: bool,
}

impl DateDisplay {
    /// Build from display settings.
    #[must_use]
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            format: config.date_format.clone(),
            local: config.local_time,
        }
    }

    /// Format `date`, falling back to RFC 3339 if the format string is unusable.
    #[must_use]
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        let mut out = String::new();
        let written = if self.local {
            write!(out, "{}", date.with_timezone(&Local).format(&self.format))
        } else {
            write!(out, "{}", date.format(&self.format))
        };
        match written {
            Ok(()) => out,
            Err(_) => date.to_rfc3339(),
        }
    }
}

/// Render a listing with its total count.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_listing(listing: &Listing, format: OutputFormat, dates: &DateDisplay) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(listing)?);
    }

    let mut out = String::new();
    if listing.no_matches() {
        out.push_str(NO_MATCHES_MESSAGE);
        out.push('\n');
    } else if format == OutputFormat::Table {
        out.push_str(&table(&listing.items, dates));
    } else {
        for ann in &listing.items {
            let _ = writeln!(out, "{}", ann.title);
            let _ = writeln!(out, "  author: {} | views: {}", ann.author, ann.views);
            let _ = writeln!(out, "  posted: {}", dates.format(&ann.date));
            let _ = writeln!(out, "  id: {}", ann.id);
            out.push('\n');
        }
    }
    let _ = writeln!(out, "Total announcements: {}", listing.total);
    Ok(out)
}

/// Render a single announcement, keeping its line breaks.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_detail(ann: &Announcement, format: OutputFormat, dates: &DateDisplay) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ann)?),
        OutputFormat::Plain | OutputFormat::Table => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", ann.title);
            let _ = writeln!(
                out,
                "author: {} | posted: {}",
                ann.author,
                dates.format(&ann.date)
            );
            let _ = writeln!(out, "views: {}", ann.views);
            out.push('\n');
            for line in ann.content.lines() {
                let _ = writeln!(out, "{line}");
            }
            Ok(out)
        }
    }
}

fn table(items: &[Announcement], dates: &DateDisplay) -> String {
    let rows: Vec<[String; 5]> = items
        .iter()
        .map(|a| {
            [
                a.id.as_str().chars().take(SHORT_ID_LEN).collect(),
                a.title.clone(),
                a.author.clone(),
                a.views.to_string(),
                dates.format(&a.date),
            ]
        })
        .collect();

    let header = ["ID", "TITLE", "AUTHOR", "VIEWS", "POSTED"].map(str::to_string);
    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}
