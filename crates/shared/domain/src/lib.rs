//! Domain layer - Core library entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Persistence mapping lives in the service crates.

pub mod book;
pub mod constants;
pub mod error;
pub mod loan_history;
pub mod user;

pub use book::{Book, BookRequest, BookStat, BookType};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use loan_history::{
    BookHistoryResponse, BookLoanRequest, BookReturnRequest, LoanStatus, UserLoanHistory,
    UserLoanHistoryResponse,
};
pub use user::{User, UserCreateRequest, UserUpdateRequest};
