//! Book catalog use-case service.
//!
//! # Responsibility
//! - Add, find, update and remove books; resolve authors and publishers on
//!   the way in.
//! - Answer relation lookups across books, authors and publishers.
//! - Translate misses on required records into `CatalogError::NotFound`.
//!
//! # Invariants
//! - Every operation is one unit of work inside a `TransactionScope`; writes
//!   commit atomically or leave no trace.
//! - Existing authors and publishers are reused, never duplicated or
//!   overwritten.
//! - Logged fields are metadata only (counts, flags, durations).

use crate::mapper::dto::{AuthorDto, BookDto};
use crate::mapper::{BookMapper, DefaultBookMapper};
use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::publisher::Publisher;
use crate::model::validation::ValidationError;
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::repo::publisher_repo::{PublisherRepository, SqlitePublisherRepository};
use crate::repo::transaction::{SqliteTransactions, TransactionScope, TxMode};
use crate::repo::{EntityKey, RepoError};
use log::{debug, info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Instant;

/// What `remove_author` does with books that still list the author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRemovalPolicy {
    /// Drop the author from every book's author set, then delete the author.
    #[default]
    Detach,
    /// Refuse to delete an author that any book still lists.
    Reject,
}

impl AuthorRemovalPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detach => "detach",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for AuthorRemovalPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "detach" => Ok(Self::Detach),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unsupported author removal policy `{other}`; expected detach|reject"
            )),
        }
    }
}

/// Errors from catalog service operations.
#[derive(Debug)]
pub enum CatalogError {
    /// A record required by the operation does not exist.
    NotFound(EntityKey),
    /// Input failed entity validation; nothing was written.
    Validation(ValidationError),
    /// Author is still listed by books and the policy is `Reject`.
    AuthorInUse { name: String, books: u64 },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "{key} not found"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::AuthorInUse { name, books } => {
                write!(f, "author `{name}` is still listed by {books} book(s)")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(key) => Self::NotFound(key),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog service facade over repository, mapper and transaction
/// implementations.
pub struct BookService<B, A, P, M, T> {
    books: B,
    authors: A,
    publishers: P,
    mapper: M,
    transactions: T,
    author_removal: AuthorRemovalPolicy,
}

/// Catalog service wired to one SQLite connection.
pub type SqliteBookService<'conn> = BookService<
    SqliteBookRepository<'conn>,
    SqliteAuthorRepository<'conn>,
    SqlitePublisherRepository<'conn>,
    DefaultBookMapper,
    SqliteTransactions<'conn>,
>;

impl<'conn> SqliteBookService<'conn> {
    /// Builds the stock service over a migrated connection.
    pub fn sqlite(conn: &'conn Connection) -> Self {
        BookService::new(
            SqliteBookRepository::new(conn),
            SqliteAuthorRepository::new(conn),
            SqlitePublisherRepository::new(conn),
            DefaultBookMapper,
            SqliteTransactions::new(conn),
        )
    }
}

impl<B, A, P, M, T> BookService<B, A, P, M, T>
where
    B: BookRepository,
    A: AuthorRepository,
    P: PublisherRepository,
    M: BookMapper,
    T: TransactionScope,
{
    /// Creates a service from explicit collaborators with the `Detach`
    /// author removal policy.
    pub fn new(books: B, authors: A, publishers: P, mapper: M, transactions: T) -> Self {
        Self {
            books,
            authors,
            publishers,
            mapper,
            transactions,
            author_removal: AuthorRemovalPolicy::default(),
        }
    }

    /// Replaces the author removal policy.
    pub fn with_author_removal(mut self, policy: AuthorRemovalPolicy) -> Self {
        self.author_removal = policy;
        self
    }

    pub fn author_removal(&self) -> AuthorRemovalPolicy {
        self.author_removal
    }

    /// Adds one book, creating missing authors and the publisher on the way.
    ///
    /// # Contract
    /// - Returns `Ok(false)` without writing anything when the ISBN exists.
    /// - Stored authors keep their stored birth date even if the request
    ///   carries a different one.
    /// - Repeated author names in the request collapse to one link.
    pub fn add_book(&self, request: &BookDto) -> CatalogResult<bool> {
        let started_at = Instant::now();
        self.transactions.run(TxMode::Write, || -> CatalogResult<bool> {
            if self.books.exists_by_isbn(&request.isbn)? {
                info!(
                    "event=book_add module=service status=skipped reason=duplicate_isbn duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(false);
            }

            let candidate = Book::new(
                request.isbn.clone(),
                request.title.clone(),
                request
                    .authors
                    .iter()
                    .map(|author| Author::new(author.name.clone(), author.birth_date)),
                Publisher::new(request.publisher.clone()),
            );
            candidate.validate()?;

            let publisher = self.publishers.find_or_create(&candidate.publisher)?;
            let publisher_created = publisher.was_created();

            let mut created_authors = 0usize;
            let mut authors = Vec::with_capacity(candidate.authors().len());
            for author in candidate.authors() {
                let resolved = self.authors.find_or_create(author)?;
                if resolved.was_created() {
                    created_authors += 1;
                }
                authors.push(resolved.into_inner());
            }

            let book = Book::new(
                candidate.isbn.clone(),
                candidate.title.clone(),
                authors,
                publisher.into_inner(),
            );
            self.books.save(&book)?;

            info!(
                "event=book_add module=service status=ok authors={} created_authors={} created_publisher={} duration_ms={}",
                book.authors().len(),
                created_authors,
                publisher_created,
                started_at.elapsed().as_millis()
            );
            Ok(true)
        })
    }

    /// Gets one book by ISBN.
    pub fn find_book_by_isbn(&self, isbn: &str) -> CatalogResult<BookDto> {
        self.transactions.run(TxMode::Read, || -> CatalogResult<BookDto> {
            let book = self.require_book(isbn)?;
            Ok(self.mapper.book_to_dto(&book))
        })
    }

    /// Deletes one book and returns it as it was before deletion.
    pub fn remove(&self, isbn: &str) -> CatalogResult<BookDto> {
        let started_at = Instant::now();
        self.transactions.run(TxMode::Write, || -> CatalogResult<BookDto> {
            let book = self.require_book(isbn)?;
            self.books.delete_by_isbn(isbn)?;
            info!(
                "event=book_remove module=service status=ok authors={} duration_ms={}",
                book.authors().len(),
                started_at.elapsed().as_millis()
            );
            Ok(self.mapper.book_to_dto(&book))
        })
    }

    /// Replaces the title of one book; authors and publisher stay untouched.
    pub fn update_book(&self, isbn: &str, title: impl Into<String>) -> CatalogResult<BookDto> {
        let title = title.into();
        let started_at = Instant::now();
        self.transactions.run(TxMode::Write, || -> CatalogResult<BookDto> {
            let mut book = self.require_book(isbn)?;
            book.title = title;
            self.books.save(&book)?;
            info!(
                "event=book_update module=service status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(self.mapper.book_to_dto(&book))
        })
    }

    /// Lists books listing `author_name`; empty when there are none.
    pub fn find_books_by_author(&self, author_name: &str) -> CatalogResult<Vec<BookDto>> {
        self.transactions.run(TxMode::Read, || -> CatalogResult<Vec<BookDto>> {
            let books = self.books.find_by_authors_name(author_name)?;
            debug!(
                "event=books_by_author module=service status=ok count={}",
                books.len()
            );
            Ok(self.map_books(&books))
        })
    }

    /// Lists books issued by `publisher_name`; empty when there are none.
    pub fn find_books_by_publisher(&self, publisher_name: &str) -> CatalogResult<Vec<BookDto>> {
        self.transactions.run(TxMode::Read, || -> CatalogResult<Vec<BookDto>> {
            let books = self.books.find_by_publisher_name(publisher_name)?;
            debug!(
                "event=books_by_publisher module=service status=ok count={}",
                books.len()
            );
            Ok(self.map_books(&books))
        })
    }

    /// Lists the authors of one book.
    pub fn find_book_authors(&self, isbn: &str) -> CatalogResult<Vec<AuthorDto>> {
        self.transactions.run(TxMode::Read, || -> CatalogResult<Vec<AuthorDto>> {
            let book = self.require_book(isbn)?;
            Ok(book
                .authors()
                .iter()
                .map(|author| self.mapper.author_to_dto(author))
                .collect())
        })
    }

    /// Lists distinct publisher names across all books by `author_name`.
    pub fn find_publishers_by_author(&self, author_name: &str) -> CatalogResult<Vec<String>> {
        self.transactions.run(TxMode::Read, || -> CatalogResult<Vec<String>> {
            let publishers = self
                .publishers
                .find_distinct_by_books_authors_name(author_name)?;
            Ok(publishers
                .into_iter()
                .map(|publisher| publisher.publisher_name)
                .collect())
        })
    }

    /// Deletes one author and returns its data.
    ///
    /// Books that list the author are handled per `AuthorRemovalPolicy`.
    pub fn remove_author(&self, author_name: &str) -> CatalogResult<AuthorDto> {
        let started_at = Instant::now();
        self.transactions.run(TxMode::Write, || -> CatalogResult<AuthorDto> {
            let author = self
                .authors
                .find_by_name(author_name)?
                .ok_or_else(|| CatalogError::NotFound(EntityKey::Author(author_name.to_string())))?;

            let linked_books = self.books.count_by_authors_name(author_name)?;
            let detached = match self.author_removal {
                AuthorRemovalPolicy::Reject if linked_books > 0 => {
                    warn!(
                        "event=author_remove module=service status=rejected policy=reject linked_books={}",
                        linked_books
                    );
                    return Err(CatalogError::AuthorInUse {
                        name: author.name,
                        books: linked_books,
                    });
                }
                AuthorRemovalPolicy::Reject => 0,
                AuthorRemovalPolicy::Detach => self.books.detach_author(author_name)?,
            };

            self.authors.delete_by_name(author_name)?;
            info!(
                "event=author_remove module=service status=ok policy={} detached_books={} duration_ms={}",
                self.author_removal.as_str(),
                detached,
                started_at.elapsed().as_millis()
            );
            Ok(self.mapper.author_to_dto(&author))
        })
    }

    fn require_book(&self, isbn: &str) -> CatalogResult<Book> {
        self.books
            .find_by_isbn(isbn)?
            .ok_or_else(|| CatalogError::NotFound(EntityKey::Book(isbn.to_string())))
    }

    fn map_books(&self, books: &[Book]) -> Vec<BookDto> {
        books
            .iter()
            .map(|book| self.mapper.book_to_dto(book))
            .collect()
    }
}
