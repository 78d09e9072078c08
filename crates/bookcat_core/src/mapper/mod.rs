//! Entity to transfer-object mapping.
//!
//! # Responsibility
//! - Flatten entity graphs into records safe to hand across the service
//!   boundary.
//! - Expand exactly one relation level: Book -> Authors, Book -> Publisher
//!   name.
//!
//! # Invariants
//! - Transfer objects never hold entity references; they own plain values.

pub mod dto;

use crate::model::author::Author;
use crate::model::book::Book;
use dto::{AuthorDto, BookDto};

/// Mapping contract used by the catalog service.
pub trait BookMapper {
    fn book_to_dto(&self, book: &Book) -> BookDto;
    fn author_to_dto(&self, author: &Author) -> AuthorDto;
}

/// Field-by-field mapper with matching names.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBookMapper;

impl BookMapper for DefaultBookMapper {
    fn book_to_dto(&self, book: &Book) -> BookDto {
        BookDto {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            authors: book
                .authors()
                .iter()
                .map(|author| self.author_to_dto(author))
                .collect(),
            publisher: book.publisher.publisher_name.clone(),
        }
    }

    fn author_to_dto(&self, author: &Author) -> AuthorDto {
        AuthorDto {
            name: author.name.clone(),
            birth_date: author.birth_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BookMapper, DefaultBookMapper};
    use crate::model::author::Author;
    use crate::model::book::Book;
    use crate::model::publisher::Publisher;
    use chrono::NaiveDate;

    #[test]
    fn book_to_dto_flattens_publisher_and_keeps_author_order() {
        let born = NaiveDate::from_ymd_opt(1950, 5, 17).unwrap();
        let book = Book::new(
            "978-0",
            "Rust in Depth",
            vec![Author::new("Zoe", born), Author::new("Adam", born)],
            Publisher::new("Acme"),
        );

        let dto = DefaultBookMapper.book_to_dto(&book);
        assert_eq!(dto.isbn, "978-0");
        assert_eq!(dto.title, "Rust in Depth");
        assert_eq!(dto.publisher, "Acme");
        let names: Vec<&str> = dto.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Adam", "Zoe"]);
        assert_eq!(dto.authors[0].birth_date, born);
    }
}
