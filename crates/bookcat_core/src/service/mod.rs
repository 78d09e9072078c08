//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into catalog-level operations.
//! - Keep callers decoupled from storage details.

pub mod book_service;
