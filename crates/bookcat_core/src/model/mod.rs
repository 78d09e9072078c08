//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted entity shapes: `Book`, `Author`, `Publisher`.
//! - Own field-level validation shared by repositories and services.
//!
//! # Invariants
//! - Every entity is identified by a natural key (ISBN or name).
//! - `Book` is the owning side of both of its relations.

pub mod author;
pub mod book;
pub mod publisher;
pub mod validation;
