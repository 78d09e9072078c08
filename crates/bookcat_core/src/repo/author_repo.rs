//! Author repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look up, find-or-create and delete authors by name.
//!
//! # Invariants
//! - `find_or_create` is one conditional insert; an existing row is never
//!   overwritten, so the first stored birth date wins.
//! - Deleting an author still linked to books fails at the storage layer;
//!   callers detach links first.

use super::{EntityKey, RepoError, RepoResult, Resolved};
use crate::model::author::Author;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for author records.
pub trait AuthorRepository {
    /// Gets one author by name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    /// Returns the stored author with this name, inserting `author` on miss.
    fn find_or_create(&self, author: &Author) -> RepoResult<Resolved<Author>>;
    /// Deletes one author by name.
    fn delete_by_name(&self, name: &str) -> RepoResult<()>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        self.conn
            .query_row(
                "SELECT name, birth_date FROM authors WHERE name = ?1;",
                [name],
                |row| Ok(read_author_columns(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_or_create(&self, author: &Author) -> RepoResult<Resolved<Author>> {
        author.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO authors (name, birth_date)
             VALUES (?1, ?2)
             ON CONFLICT (name) DO NOTHING;",
            params![
                author.name.as_str(),
                author.birth_date.format(BIRTH_DATE_FORMAT).to_string()
            ],
        )?;

        let stored = self.find_by_name(&author.name)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "author `{}` missing right after upsert",
                author.name
            ))
        })?;

        Ok(if inserted == 1 {
            Resolved::Created(stored)
        } else {
            Resolved::Existing(stored)
        })
    }

    fn delete_by_name(&self, name: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE name = ?1;", [name])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Author(name.to_string())));
        }

        Ok(())
    }
}

/// Reads `name` and `birth_date` columns into an `Author`.
pub(crate) fn read_author_columns(row: &Row<'_>) -> RepoResult<Author> {
    let name: String = row.get("name")?;
    let birth_text: String = row.get("birth_date")?;
    let birth_date = NaiveDate::parse_from_str(&birth_text, BIRTH_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid birth date `{birth_text}` in authors.birth_date"
        ))
    })?;

    let author = Author::new(name, birth_date);
    author.validate()?;
    Ok(author)
}
