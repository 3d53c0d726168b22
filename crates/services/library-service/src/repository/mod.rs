//! Repository layer.
//!
//! Repositories abstract data access from the service layer.

pub mod base;
pub mod book_repository;
pub mod entities;
pub mod loan_history_repository;
pub mod user_repository;

pub use base::{stream_all, EntityRepository, Persistable, SeaRepository};
pub use book_repository::{BookRepository, BookStore};
pub use loan_history_repository::{UserLoanHistoryRepository, UserLoanHistoryStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use book_repository::MockBookRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use loan_history_repository::MockUserLoanHistoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
