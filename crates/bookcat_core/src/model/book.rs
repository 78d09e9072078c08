//! Book entity.
//!
//! # Responsibility
//! - Hold one book with its resolved authors and publisher.
//! - Keep the author set free of duplicate names.
//!
//! # Invariants
//! - `isbn` never changes after creation; only `title` is mutable.
//! - `authors` is sorted by name and contains each name at most once.
//! - A book always references exactly one publisher.

use super::author::Author;
use super::publisher::Publisher;
use super::validation::{require_non_blank, validate_isbn, ValidationError};
use std::collections::HashSet;

/// Natural key for books.
pub type Isbn = String;

/// Persisted book record with its relations resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub isbn: Isbn,
    pub title: String,
    authors: Vec<Author>,
    pub publisher: Publisher,
}

impl Book {
    /// Creates a book, collapsing repeated author names.
    ///
    /// The first occurrence of a name wins; the resulting set is ordered by
    /// author name.
    pub fn new(
        isbn: impl Into<Isbn>,
        title: impl Into<String>,
        authors: impl IntoIterator<Item = Author>,
        publisher: Publisher,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut authors: Vec<Author> = authors
            .into_iter()
            .filter(|author| seen.insert(author.name.clone()))
            .collect();
        authors.sort_by(|left, right| left.name.cmp(&right.name));

        Self {
            isbn: isbn.into(),
            title: title.into(),
            authors,
            publisher,
        }
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Checks the book and every related entity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_isbn(&self.isbn)?;
        require_non_blank(&self.title, ValidationError::BlankTitle)?;
        self.publisher.validate()?;
        for author in &self.authors {
            author.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Book;
    use crate::model::author::Author;
    use crate::model::publisher::Publisher;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn new_collapses_duplicate_authors_keeping_first() {
        let book = Book::new(
            "978-1",
            "Duplicates",
            vec![
                Author::new("Zed", date(1970, 1, 1)),
                Author::new("Amy", date(1980, 2, 2)),
                Author::new("Zed", date(1999, 9, 9)),
            ],
            Publisher::new("Acme"),
        );

        let names: Vec<&str> = book.authors().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
        assert_eq!(book.authors()[1].birth_date, date(1970, 1, 1));
    }

    #[test]
    fn validate_reports_first_invalid_field() {
        let book = Book::new("978-1", "  ", Vec::new(), Publisher::new("Acme"));
        assert_eq!(
            book.validate(),
            Err(crate::model::validation::ValidationError::BlankTitle)
        );

        let book = Book::new(
            "978-1",
            "Title",
            vec![Author::new("", date(1970, 1, 1))],
            Publisher::new("Acme"),
        );
        assert_eq!(
            book.validate(),
            Err(crate::model::validation::ValidationError::BlankAuthorName)
        );
    }
}
