use bookcat_core::{AuthorDto, BookDto};
use chrono::NaiveDate;

#[test]
fn book_dto_serializes_with_flat_publisher_and_iso_dates() {
    let dto = BookDto {
        isbn: "978-0".to_string(),
        title: "Rust".to_string(),
        authors: vec![AuthorDto {
            name: "Jane Doe".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1970, 3, 1).unwrap(),
        }],
        publisher: "Acme".to_string(),
    };

    let json = serde_json::to_value(&dto).unwrap();
    assert_eq!(json["isbn"], "978-0");
    assert_eq!(json["publisher"], "Acme");
    assert_eq!(json["authors"][0]["name"], "Jane Doe");
    assert_eq!(json["authors"][0]["birth_date"], "1970-03-01");
}

#[test]
fn book_dto_deserializes_without_authors() {
    let value = serde_json::json!({
        "isbn": "978-1",
        "title": "Anonymous",
        "publisher": "Acme"
    });

    let dto: BookDto = serde_json::from_value(value).unwrap();
    assert!(dto.authors.is_empty());
}

#[test]
fn author_dto_rejects_malformed_birth_date() {
    let value = serde_json::json!({ "name": "Jane Doe", "birth_date": "03/01/1970" });
    assert!(serde_json::from_value::<AuthorDto>(value).is_err());
}
