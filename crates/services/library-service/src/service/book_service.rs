//! Book service - registration, lending and statistics.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use common::{AppError, AppResult, OptionExt, Page, PageRequest};
use domain::{
    Book, BookLoanRequest, BookRequest, BookReturnRequest, BookStat, DomainError, LoanStatus,
    UserLoanHistory,
};

use crate::infra::UnitOfWork;
use crate::repository::{BookRepository, UserLoanHistoryRepository, UserRepository};
use crate::with_transaction;

/// Book service trait for dependency injection.
#[async_trait]
pub trait BookService: Send + Sync {
    /// Register a new book. Names are unique.
    async fn save_book(&self, request: BookRequest) -> AppResult<Book>;

    async fn get_books(&self, request: PageRequest) -> AppResult<Page<Book>>;

    async fn get_book(&self, name: &str) -> AppResult<Book>;

    async fn delete_book(&self, id: i64) -> AppResult<()>;

    /// Lend a book to a user. Fails if the book is currently out.
    async fn loan_book(&self, request: BookLoanRequest) -> AppResult<UserLoanHistory>;

    /// Close the user's open loan of the book
    async fn return_book(&self, request: BookReturnRequest) -> AppResult<UserLoanHistory>;

    /// Number of books currently lent out
    async fn count_loaned_books(&self) -> AppResult<u64>;

    async fn book_statistics(&self) -> AppResult<Vec<BookStat>>;
}

/// Concrete implementation of BookService.
pub struct BookManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookManager<U> {
    /// Create new book service instance
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> BookService for BookManager<U> {
    async fn save_book(&self, request: BookRequest) -> AppResult<Book> {
        with_transaction!(self.uow, |ctx| {
            let books = ctx.books();
            register_book(&books, request).await
        })
    }

    async fn get_books(&self, request: PageRequest) -> AppResult<Page<Book>> {
        self.uow.books().find_page(request).await
    }

    async fn get_book(&self, name: &str) -> AppResult<Book> {
        self.uow
            .books()
            .find_by_name(name)
            .await?
            .ok_or_not_found(format!("Book `{}`", name))
    }

    async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.uow.books().delete_by_id(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn loan_book(&self, request: BookLoanRequest) -> AppResult<UserLoanHistory> {
        with_transaction!(self.uow, |ctx| {
            let books = ctx.books();
            let users = ctx.users();
            let loans = ctx.loan_histories();
            lend_book(&books, &users, &loans, request).await
        })
    }

    async fn return_book(&self, request: BookReturnRequest) -> AppResult<UserLoanHistory> {
        with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let loans = ctx.loan_histories();
            take_back_book(&users, &loans, request).await
        })
    }

    async fn count_loaned_books(&self) -> AppResult<u64> {
        self.uow
            .loan_histories()
            .count_by_status(LoanStatus::Loaned)
            .await
    }

    async fn book_statistics(&self) -> AppResult<Vec<BookStat>> {
        self.uow.books().stats().await
    }
}

// =============================================================================
// Workflows
// =============================================================================

async fn register_book(books: &dyn BookRepository, request: BookRequest) -> AppResult<Book> {
    request.validate().map_err(DomainError::from)?;

    let book = books
        .save(Book::new(request.name, request.book_type)?)
        .await?;
    tracing::info!(book_id = ?book.id, name = %book.name, "Book registered");
    Ok(book)
}

async fn lend_book(
    books: &dyn BookRepository,
    users: &dyn UserRepository,
    loans: &dyn UserLoanHistoryRepository,
    request: BookLoanRequest,
) -> AppResult<UserLoanHistory> {
    request.validate().map_err(DomainError::from)?;

    let book = books
        .find_by_name(&request.book_name)
        .await?
        .ok_or_not_found(format!("Book `{}`", request.book_name))?;

    let open = loans
        .find_by_book_name_and_status(&book.name, LoanStatus::Loaned)
        .await?;
    if open.is_some() {
        return Err(AppError::validation("book is already loaned"));
    }

    let user = users
        .find_by_name(&request.user_name)
        .await?
        .ok_or_not_found(format!("User `{}`", request.user_name))?;

    let history = loans.save(user.loan_book(&book)?).await?;
    tracing::info!(user = %user.name, book = %book.name, "Book loaned");
    Ok(history)
}

async fn take_back_book(
    users: &dyn UserRepository,
    loans: &dyn UserLoanHistoryRepository,
    request: BookReturnRequest,
) -> AppResult<UserLoanHistory> {
    request.validate().map_err(DomainError::from)?;

    let user = users
        .find_by_name(&request.user_name)
        .await?
        .ok_or_not_found(format!("User `{}`", request.user_name))?;
    let user_id = user
        .id
        .ok_or_else(|| AppError::internal("stored user has no id"))?;

    let mut history = loans
        .find_by_user_id_and_book_name_and_status(user_id, &request.book_name, LoanStatus::Loaned)
        .await?
        .ok_or_not_found(format!(
            "Open loan of `{}` by `{}`",
            request.book_name, request.user_name
        ))?;

    history.do_return()?;
    let history = loans.save(history).await?;
    tracing::info!(user = %user.name, book = %history.book_name, "Book returned");
    Ok(history)
}
