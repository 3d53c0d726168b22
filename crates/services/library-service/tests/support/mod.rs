//! Shared fixtures: a migrated in-memory SQLite database per test.

#![allow(dead_code)]

use std::sync::Arc;

use common::DatabaseConfig;
use domain::{Book, BookType};
use library_service_lib::infra::Database;
use library_service_lib::repository::{BookStore, UserLoanHistoryStore, UserStore};

/// Fresh database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup() -> Database {
    let mut config = DatabaseConfig::with_url("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;

    Database::connect(&config)
        .await
        .expect("in-memory database should connect and migrate")
}

pub fn book_store(db: &Database) -> BookStore {
    BookStore::new(Arc::new(db.get_connection()))
}

pub fn user_store(db: &Database) -> UserStore {
    UserStore::new(Arc::new(db.get_connection()))
}

pub fn loan_history_store(db: &Database) -> UserLoanHistoryStore {
    UserLoanHistoryStore::new(Arc::new(db.get_connection()))
}

pub fn book(name: &str, book_type: BookType) -> Book {
    Book::new(name, book_type).expect("valid book")
}
