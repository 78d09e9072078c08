//! Publisher repository contracts and SQLite implementation.

use super::{RepoError, RepoResult, Resolved};
use crate::model::publisher::Publisher;
use rusqlite::{Connection, OptionalExtension};

/// Repository interface for publisher records.
pub trait PublisherRepository {
    fn find_by_name(&self, publisher_name: &str) -> RepoResult<Option<Publisher>>;
    /// Returns the stored publisher with this name, inserting it on miss.
    fn find_or_create(&self, publisher: &Publisher) -> RepoResult<Resolved<Publisher>>;
    /// Lists distinct publishers of books written by `author_name`, by name.
    fn find_distinct_by_books_authors_name(&self, author_name: &str)
        -> RepoResult<Vec<Publisher>>;
}

/// SQLite-backed publisher repository.
pub struct SqlitePublisherRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePublisherRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PublisherRepository for SqlitePublisherRepository<'_> {
    fn find_by_name(&self, publisher_name: &str) -> RepoResult<Option<Publisher>> {
        let name = self
            .conn
            .query_row(
                "SELECT publisher_name FROM publishers WHERE publisher_name = ?1;",
                [publisher_name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(name.map(Publisher::new))
    }

    fn find_or_create(&self, publisher: &Publisher) -> RepoResult<Resolved<Publisher>> {
        publisher.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO publishers (publisher_name)
             VALUES (?1)
             ON CONFLICT (publisher_name) DO NOTHING;",
            [publisher.publisher_name.as_str()],
        )?;

        let stored = self
            .find_by_name(&publisher.publisher_name)?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "publisher `{}` missing right after upsert",
                    publisher.publisher_name
                ))
            })?;

        Ok(if inserted == 1 {
            Resolved::Created(stored)
        } else {
            Resolved::Existing(stored)
        })
    }

    fn find_distinct_by_books_authors_name(
        &self,
        author_name: &str,
    ) -> RepoResult<Vec<Publisher>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT b.publisher_name
             FROM books b
             INNER JOIN book_authors ba ON ba.book_isbn = b.isbn
             WHERE ba.author_name = ?1
             ORDER BY b.publisher_name ASC;",
        )?;
        let mut rows = stmt.query([author_name])?;
        let mut publishers = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            publishers.push(Publisher::new(name));
        }
        Ok(publishers)
    }
}
