//! Command-line front end for the book catalog.
//!
//! # Responsibility
//! - Map subcommands onto `BookService` operations.
//! - Print transfer records as JSON; report failures on stderr.
//!
//! Settings come from `BOOKCAT_*` variables or a JSON file passed with
//! `--config`; `--db` overrides the database path from either source.

use bookcat_core::{AuthorDto, BookDto, CatalogConfig};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bookcat")]
#[command(about = "Manage a book catalog of books, authors and publishers")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file; overrides configuration.
    ///
    /// Without this or `BOOKCAT_DB_PATH` the catalog is in memory and is
    /// discarded when the command exits.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check core linkage.
    Ping,
    /// Print the core crate version.
    Version,
    /// Add a book, creating missing authors and the publisher.
    Add {
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        publisher: String,
        /// Author as `NAME=YYYY-MM-DD`; repeat for several authors.
        #[arg(long = "author", value_parser = parse_author)]
        authors: Vec<AuthorDto>,
    },
    /// Show one book.
    Get { isbn: String },
    /// Delete one book and print it.
    Remove { isbn: String },
    /// Replace the title of one book.
    Update { isbn: String, title: String },
    /// List books by author name.
    ByAuthor { name: String },
    /// List books by publisher name.
    ByPublisher { name: String },
    /// List the authors of one book.
    Authors { isbn: String },
    /// List distinct publishers an author has books with.
    PublishersOf { name: String },
    /// Delete one author.
    RemoveAuthor { name: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Ping => {
            println!("bookcat_core ping={}", bookcat_core::ping());
            return Ok(());
        }
        Command::Version => {
            println!("bookcat_core version={}", bookcat_core::core_version());
            return Ok(());
        }
        _ => {}
    }

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    config.init_logging()?;

    if let Some(note) = ephemeral_store_note(&config) {
        warn!("event=cli_command module=cli status=warn store=memory");
        eprintln!("{note}");
    }

    let conn = config.open_db()?;
    let service = config.book_service(&conn);
    info!(
        "event=cli_command module=cli status=start persistent={}",
        !config.is_in_memory()
    );

    match cli.command {
        Command::Ping | Command::Version => Ok(()),
        Command::Add {
            isbn,
            title,
            publisher,
            authors,
        } => {
            let request = BookDto {
                isbn,
                title,
                authors,
                publisher,
            };
            let added = service.add_book(&request)?;
            print_json(&serde_json::json!({ "added": added }))
        }
        Command::Get { isbn } => print_json(&service.find_book_by_isbn(&isbn)?),
        Command::Remove { isbn } => print_json(&service.remove(&isbn)?),
        Command::Update { isbn, title } => print_json(&service.update_book(&isbn, title)?),
        Command::ByAuthor { name } => print_json(&service.find_books_by_author(&name)?),
        Command::ByPublisher { name } => print_json(&service.find_books_by_publisher(&name)?),
        Command::Authors { isbn } => print_json(&service.find_book_authors(&isbn)?),
        Command::PublishersOf { name } => {
            print_json(&service.find_publishers_by_author(&name)?)
        }
        Command::RemoveAuthor { name } => print_json(&service.remove_author(&name)?),
    }
}

fn ephemeral_store_note(config: &CatalogConfig) -> Option<&'static str> {
    config.is_in_memory().then_some(
        "note: no --db or BOOKCAT_DB_PATH given; using an in-memory catalog that is discarded on exit",
    )
}

fn load_config(path: Option<&PathBuf>) -> Result<CatalogConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(CatalogConfig::from_env()?);
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
    let config: CatalogConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_author(value: &str) -> Result<AuthorDto, String> {
    let (name, date) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=YYYY-MM-DD, got `{value}`"))?;
    let birth_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid birth date `{date}`: {err}"))?;
    Ok(AuthorDto {
        name: name.trim().to_string(),
        birth_date,
    })
}
