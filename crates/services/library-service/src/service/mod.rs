//! Service layer - Business logic.

mod book_service;
mod user_service;

pub use book_service::{BookManager, BookService};
pub use user_service::{UserManager, UserService};
