//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist books together with their author links and publisher key.
//! - Answer relation queries (books by author, books by publisher).
//!
//! # Invariants
//! - `save` replaces the whole author link set atomically.
//! - Relation queries return each book at most once, ordered by ISBN.
//! - Referenced authors and publishers must already be stored.

use super::author_repo::read_author_columns;
use super::transaction::{within, TxMode};
use super::{EntityKey, RepoError, RepoResult};
use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::publisher::Publisher;
use rusqlite::{params, Connection, OptionalExtension};

const BOOK_SELECT_SQL: &str = "SELECT
    b.isbn,
    b.title,
    b.publisher_name
FROM books b";

/// Repository interface for book records and book-owned relations.
pub trait BookRepository {
    fn exists_by_isbn(&self, isbn: &str) -> RepoResult<bool>;
    /// Gets one book with authors and publisher resolved.
    fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>>;
    /// Inserts or updates one book and replaces its author links.
    fn save(&self, book: &Book) -> RepoResult<()>;
    /// Deletes one book and its author links.
    fn delete_by_isbn(&self, isbn: &str) -> RepoResult<()>;
    /// Lists books whose author set contains `author_name`.
    fn find_by_authors_name(&self, author_name: &str) -> RepoResult<Vec<Book>>;
    /// Lists books issued by `publisher_name`.
    fn find_by_publisher_name(&self, publisher_name: &str) -> RepoResult<Vec<Book>>;
    /// Counts books whose author set contains `author_name`.
    fn count_by_authors_name(&self, author_name: &str) -> RepoResult<u64>;
    /// Removes `author_name` from every book's author set.
    ///
    /// Returns the number of books that were linked to the author.
    fn detach_author(&self, author_name: &str) -> RepoResult<usize>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_books(&self, sql: &str, key: &str) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([key])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            let isbn: String = row.get("isbn")?;
            let title: String = row.get("title")?;
            let publisher_name: String = row.get("publisher_name")?;
            books.push(self.assemble(isbn, title, publisher_name)?);
        }

        Ok(books)
    }

    fn assemble(&self, isbn: String, title: String, publisher_name: String) -> RepoResult<Book> {
        let authors = load_authors_for_book(self.conn, &isbn)?;
        let book = Book::new(isbn, title, authors, Publisher::new(publisher_name));
        book.validate()?;
        Ok(book)
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn exists_by_isbn(&self, isbn: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = ?1);",
            [isbn],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        let row = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE b.isbn = ?1;"),
                [isbn],
                |row| {
                    Ok((
                        row.get::<_, String>("isbn")?,
                        row.get::<_, String>("title")?,
                        row.get::<_, String>("publisher_name")?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((isbn, title, publisher_name)) => {
                Ok(Some(self.assemble(isbn, title, publisher_name)?))
            }
            None => Ok(None),
        }
    }

    fn save(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        within(self.conn, TxMode::Write, || -> RepoResult<()> {
            self.conn.execute(
                "INSERT INTO books (isbn, title, publisher_name)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (isbn) DO UPDATE SET
                    title = excluded.title,
                    publisher_name = excluded.publisher_name;",
                params![
                    book.isbn.as_str(),
                    book.title.as_str(),
                    book.publisher.publisher_name.as_str(),
                ],
            )?;

            self.conn.execute(
                "DELETE FROM book_authors WHERE book_isbn = ?1;",
                [book.isbn.as_str()],
            )?;

            let mut link = self.conn.prepare(
                "INSERT INTO book_authors (book_isbn, author_name) VALUES (?1, ?2);",
            )?;
            for author in book.authors() {
                link.execute(params![book.isbn.as_str(), author.name.as_str()])?;
            }

            Ok(())
        })
    }

    fn delete_by_isbn(&self, isbn: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE isbn = ?1;", [isbn])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Book(isbn.to_string())));
        }

        Ok(())
    }

    fn find_by_authors_name(&self, author_name: &str) -> RepoResult<Vec<Book>> {
        self.query_books(
            &format!(
                "{BOOK_SELECT_SQL}
                 WHERE EXISTS (
                    SELECT 1
                    FROM book_authors ba
                    WHERE ba.book_isbn = b.isbn
                      AND ba.author_name = ?1
                 )
                 ORDER BY b.isbn ASC;"
            ),
            author_name,
        )
    }

    fn find_by_publisher_name(&self, publisher_name: &str) -> RepoResult<Vec<Book>> {
        self.query_books(
            &format!("{BOOK_SELECT_SQL} WHERE b.publisher_name = ?1 ORDER BY b.isbn ASC;"),
            publisher_name,
        )
    }

    fn count_by_authors_name(&self, author_name: &str) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM book_authors WHERE author_name = ?1;",
            [author_name],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative link count {count}")))
    }

    fn detach_author(&self, author_name: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM book_authors WHERE author_name = ?1;",
            [author_name],
        )?;
        Ok(removed)
    }
}

fn load_authors_for_book(conn: &Connection, isbn: &str) -> RepoResult<Vec<Author>> {
    let mut stmt = conn.prepare(
        "SELECT a.name, a.birth_date
         FROM book_authors ba
         INNER JOIN authors a ON a.name = ba.author_name
         WHERE ba.book_isbn = ?1
         ORDER BY a.name ASC;",
    )?;
    let mut rows = stmt.query([isbn])?;
    let mut authors = Vec::new();
    while let Some(row) = rows.next()? {
        authors.push(read_author_columns(row)?);
    }
    Ok(authors)
}
