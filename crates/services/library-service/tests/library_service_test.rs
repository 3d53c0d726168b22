//! Service and transaction integration tests against SQLite.

mod support;

use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{
    BookLoanRequest, BookRequest, BookReturnRequest, BookType, LoanStatus, UserCreateRequest,
    UserUpdateRequest,
};
use library_service_lib::infra::{Database, Persistence, UnitOfWork};
use library_service_lib::repository::{EntityRepository, UserLoanHistoryRepository};
use library_service_lib::service::{BookService, UserService};
use library_service_lib::Library;

use crate::support::{book, book_store, loan_history_store, setup, user_store};

async fn library_with(users: &[&str], books: &[&str]) -> (Database, Library) {
    let db = setup().await;
    let library = Library::from_database(&db);

    for name in users {
        library
            .users
            .save_user(UserCreateRequest::new(*name, None))
            .await
            .unwrap();
    }
    for name in books {
        library
            .books
            .save_book(BookRequest::new(*name, BookType::Computer))
            .await
            .unwrap();
    }

    (db, library)
}

#[tokio::test]
async fn loan_and_return_cycle() {
    let (db, library) = library_with(&["A"], &["Spring Boot"]).await;

    let loan = library
        .books
        .loan_book(BookLoanRequest::new("A", "Spring Boot"))
        .await
        .unwrap();
    assert_eq!(loan.status, LoanStatus::Loaned);
    assert_eq!(library.books.count_loaned_books().await.unwrap(), 1);

    let returned = library
        .books
        .return_book(BookReturnRequest::new("A", "Spring Boot"))
        .await
        .unwrap();
    assert_eq!(returned.id, loan.id);
    assert_eq!(returned.status, LoanStatus::Returned);
    assert!(returned.returned_at.is_some());
    assert_eq!(library.books.count_loaned_books().await.unwrap(), 0);

    // A returned book can be lent again
    library
        .books
        .loan_book(BookLoanRequest::new("A", "Spring Boot"))
        .await
        .unwrap();
    assert_eq!(loan_history_store(&db).count().await.unwrap(), 2);
}

#[tokio::test]
async fn loaned_book_cannot_be_loaned_again() {
    let (db, library) = library_with(&["A", "B"], &["Spring Boot"]).await;
    library
        .books
        .loan_book(BookLoanRequest::new("A", "Spring Boot"))
        .await
        .unwrap();

    let err = library
        .books
        .loan_book(BookLoanRequest::new("B", "Spring Boot"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref msg) if msg == "book is already loaned"));
    assert_eq!(loan_history_store(&db).count().await.unwrap(), 1);
}

#[tokio::test]
async fn loan_to_unknown_user_records_nothing() {
    let (db, library) = library_with(&[], &["Spring Boot"]).await;

    let err = library
        .books
        .loan_book(BookLoanRequest::new("Ghost", "Spring Boot"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(loan_history_store(&db).count().await.unwrap(), 0);
}

#[tokio::test]
async fn returning_a_book_that_is_not_out_fails() {
    let (_db, library) = library_with(&["A"], &["Spring Boot"]).await;

    let err = library
        .books
        .return_book(BookReturnRequest::new("A", "Spring Boot"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_book_through_service_is_constraint_violation() {
    let (db, library) = library_with(&[], &["Clean Code"]).await;

    let err = library
        .books
        .save_book(BookRequest::new("Clean Code", BookType::Economy))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConstraintViolation(_)));
    assert_eq!(book_store(&db).count().await.unwrap(), 1);
}

#[tokio::test]
async fn failed_transaction_rolls_back() {
    let db = setup().await;
    let uow = Persistence::new(db.get_connection());

    let result: AppResult<()> = uow
        .transaction(|ctx| {
            Box::pin(async move {
                let books = ctx.books();
                books.save(book("Clean Code", BookType::Computer)).await?;
                Err::<(), AppError>(AppError::validation("abort"))
            })
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(book_store(&db).count().await.unwrap(), 0);
}

#[tokio::test]
async fn committed_transaction_is_visible() {
    let db = setup().await;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    let saved = uow
        .transaction(|ctx| {
            Box::pin(async move {
                let books = ctx.books();
                books.save(book("Clean Code", BookType::Computer)).await
            })
        })
        .await
        .unwrap();

    let found = uow.books().find_by_id(saved.id.unwrap()).await.unwrap();
    assert_eq!(found, Some(saved));
}

#[tokio::test]
async fn users_are_renamed_and_listed_in_id_order() {
    let (_db, library) = library_with(&["A", "B"], &[]).await;

    let renamed = library
        .users
        .update_user_name(UserUpdateRequest::new(1, "C"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "C");

    let names: Vec<_> = library
        .users
        .get_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, ["C", "B"]);

    let err = library
        .users
        .update_user_name(UserUpdateRequest::new(99, "D"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn loan_histories_are_reported_per_user() {
    let (_db, library) = library_with(&["A", "B"], &["Spring Boot", "Refactoring"]).await;
    for name in ["Spring Boot", "Refactoring"] {
        library
            .books
            .loan_book(BookLoanRequest::new("A", name))
            .await
            .unwrap();
    }
    library
        .books
        .return_book(BookReturnRequest::new("A", "Refactoring"))
        .await
        .unwrap();

    let histories = library.users.get_user_loan_histories().await.unwrap();

    assert_eq!(histories.len(), 2);
    assert_eq!(histories[0].name, "A");
    let books: Vec<_> = histories[0]
        .books
        .iter()
        .map(|b| (b.name.as_str(), b.is_return))
        .collect();
    assert_eq!(books, [("Spring Boot", false), ("Refactoring", true)]);
    assert!(histories[1].books.is_empty());
}

#[tokio::test]
async fn deleting_a_user_removes_their_histories() {
    let (db, library) = library_with(&["A"], &["Spring Boot"]).await;
    library
        .books
        .loan_book(BookLoanRequest::new("A", "Spring Boot"))
        .await
        .unwrap();

    library.users.delete_user("A").await.unwrap();

    assert_eq!(user_store(&db).count().await.unwrap(), 0);
    let loans = loan_history_store(&db);
    assert_eq!(loans.count().await.unwrap(), 0);
    assert_eq!(loans.count_by_status(LoanStatus::Loaned).await.unwrap(), 0);

    let err = library.users.delete_user("A").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn statistics_group_books_by_type() {
    let (_db, library) = library_with(&[], &["A", "B"]).await;
    library
        .books
        .save_book(BookRequest::new("C", BookType::Society))
        .await
        .unwrap();

    let stats = library.books.book_statistics().await.unwrap();

    let counts: Vec<_> = stats.iter().map(|s| (s.book_type, s.count)).collect();
    assert_eq!(counts, [(BookType::Computer, 2), (BookType::Society, 1)]);
}
