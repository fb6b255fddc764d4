//! `nboard` - CLI for noticeboard
//!
//! Each invocation loads the board, runs exactly one command against it and
//! exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use noticeboard::board::{AutoConfirm, Confirm};
use noticeboard::cli::{self, unescape_newlines, Cli, ConfigCommand, PromptConfirm};
use noticeboard::render::{render_detail, render_listing, DateDisplay};
use noticeboard::{
    init_logging, AnnouncementId, AnnouncementStore, Board, Command, Config, Error, Outcome,
    SqliteBlobStore,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    if let Err(err) = run(cli.command, &config) {
        if let Some(user_err) = err.downcast_ref::<Error>().filter(|e| e.is_user_facing()) {
            eprintln!("{user_err}");
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

fn run(command: cli::Command, config: &Config) -> anyhow::Result<()> {
    let dates = DateDisplay::new(&config.display);

    match command {
        cli::Command::Post(cmd) => {
            let outcome = execute(
                config,
                Command::Create {
                    title: cmd.title,
                    content: unescape_newlines(&cmd.content),
                    author: cmd.author,
                },
                &mut AutoConfirm(true),
            )?;
            if let Some(ann) = &outcome.affected {
                println!("Posted announcement {}", ann.id);
            }
            println!("Total announcements: {}", outcome.listing.total);
        }
        cli::Command::List(cmd) => {
            let outcome = execute(
                config,
                Command::Search { term: cmd.search },
                &mut AutoConfirm(true),
            )?;
            print!("{}", render_listing(&outcome.listing, cmd.format, &dates)?);
        }
        cli::Command::Show(cmd) => {
            let id = AnnouncementId::from(cmd.id);
            let outcome = execute(config, Command::View { id: id.clone() }, &mut AutoConfirm(true))?;
            match &outcome.affected {
                Some(ann) => print!("{}", render_detail(ann, cmd.format, &dates)?),
                None => println!("No announcement with id {id}"),
            }
        }
        cli::Command::Edit(cmd) => {
            let id = AnnouncementId::from(cmd.id);
            let outcome = execute(
                config,
                Command::Update {
                    id: id.clone(),
                    title: cmd.title,
                    content: unescape_newlines(&cmd.content),
                },
                &mut AutoConfirm(true),
            )?;
            match &outcome.affected {
                Some(ann) => println!("Updated announcement {}", ann.id),
                None => println!("No announcement with id {id}"),
            }
        }
        cli::Command::Delete(cmd) => {
            let id = AnnouncementId::from(cmd.id);
            let mut confirm: Box<dyn Confirm> = if cmd.yes {
                Box::new(AutoConfirm(true))
            } else {
                Box::new(PromptConfirm::new(std::io::stdin().lock(), std::io::stdout()))
            };
            let outcome = execute(config, Command::Delete { id: id.clone() }, confirm.as_mut())?;
            match &outcome.affected {
                Some(ann) => println!("Deleted announcement {}", ann.id),
                None => println!("No announcement with id {id}"),
            }
            println!("Total announcements: {}", outcome.listing.total);
        }
        cli::Command::Status(cmd) => handle_status(config, &dates, cmd.json)?,
        cli::Command::Config(cmd) => handle_config(config, cmd)?,
    }
    Ok(())
}

fn open_board(config: &Config) -> anyhow::Result<(Board, noticeboard::StorageStats)> {
    let path = config.database_path();
    let backend = SqliteBlobStore::open(&path)
        .with_context(|| format!("opening board database at {}", path.display()))?;
    let stats = backend.stats()?;
    let store = AnnouncementStore::open(Box::new(backend), config.board.storage_key.clone())?;
    Ok((Board::new(store), stats))
}

fn execute(config: &Config, command: Command, confirm: &mut dyn Confirm) -> anyhow::Result<Outcome> {
    let (mut board, _) = open_board(config)?;
    Ok(board.execute(command, confirm)?)
}

fn handle_status(config: &Config, dates: &DateDisplay, json: bool) -> anyhow::Result<()> {
    let (board, stats) = open_board(config)?;
    let items = board.store().all();
    let newest = items.first().map(|a| a.date);
    let oldest = items.last().map(|a| a.date);

    if json {
        let status = serde_json::json!({
            "announcements": items.len(),
            "newest": newest,
            "oldest": oldest,
            "storage_key": board.store().key(),
            "database_path": config.database_path(),
            "database_bytes": stats.db_size_bytes,
            "last_write": stats.last_write,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let show = |d: Option<chrono::DateTime<chrono::Utc>>| {
            d.map_or_else(|| "-".to_string(), |d| dates.format(&d))
        };
        println!("nboard status");
        println!("-------------");
        println!("Announcements: {}", items.len());
        println!("Newest:        {}", show(newest));
        println!("Oldest:        {}", show(oldest));
        println!("Storage key:   {}", board.store().key());
        println!("Database:      {}", config.database_path().display());
        println!("Database size: {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Board]");
                println!("  Storage key:    {}", config.board.storage_key);
                println!();
                println!("[Display]");
                println!("  Date format:    {}", config.display.date_format);
                println!("  Local time:     {}", config.display.local_time);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
