//! Book repository integration tests against SQLite.

mod support;

use futures::TryStreamExt;

use common::{AppError, PageRequest, Sort};
use domain::{Book, BookStat, BookType};
use library_service_lib::repository::{stream_all, BookRepository, EntityRepository};

use crate::support::{book, book_store, setup};

#[tokio::test]
async fn save_assigns_id_and_round_trips() {
    let db = setup().await;
    let books = book_store(&db);

    let saved = books
        .save(book("Clean Code", BookType::Computer))
        .await
        .unwrap();

    assert_eq!(saved.id, Some(1));
    assert_eq!(saved.name, "Clean Code");

    let found = books.find_by_id(1).await.unwrap();
    assert_eq!(found, Some(saved));
}

#[tokio::test]
async fn find_by_name_matches_exact_name_only() {
    let db = setup().await;
    let books = book_store(&db);
    books
        .save(book("Clean Code", BookType::Computer))
        .await
        .unwrap();

    let found = books.find_by_name("Clean Code").await.unwrap().unwrap();
    assert_eq!(found.id, Some(1));

    assert!(books.find_by_name("Nonexistent").await.unwrap().is_none());
    assert!(books.find_by_name("clean code").await.unwrap().is_none());
}

#[tokio::test]
async fn save_updates_stored_entity() {
    let db = setup().await;
    let books = book_store(&db);
    let mut saved = books
        .save(book("Refactoring", BookType::Computer))
        .await
        .unwrap();

    saved.book_type = BookType::Science;
    let updated = books.save(saved.clone()).await.unwrap();
    assert_eq!(updated, saved);

    // Saving identical state again changes nothing
    let again = books.save(updated.clone()).await.unwrap();
    assert_eq!(again, updated);
    assert_eq!(books.count().await.unwrap(), 1);
}

#[tokio::test]
async fn save_with_unknown_id_gets_a_generated_id() {
    let db = setup().await;
    let books = book_store(&db);

    let mut detached = book("Domain-Driven Design", BookType::Computer);
    detached.id = Some(42);

    let saved = books.save(detached).await.unwrap();
    assert_eq!(saved.id, Some(1));
    assert!(!books.exists_by_id(42).await.unwrap());

    // Fresh inserts keep following the generated sequence
    let next = books
        .save(book("Refactoring", BookType::Computer))
        .await
        .unwrap();
    assert_eq!(next.id, Some(2));
    assert_eq!(books.count().await.unwrap(), 2);
}

#[tokio::test]
async fn duplicate_name_is_constraint_violation() {
    let db = setup().await;
    let books = book_store(&db);
    books
        .save(book("Clean Code", BookType::Computer))
        .await
        .unwrap();

    let err = books
        .save(book("Clean Code", BookType::Economy))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConstraintViolation(_)), "got {err:?}");
    assert_eq!(books.count().await.unwrap(), 1);
}

#[tokio::test]
async fn delete_removes_entity() {
    let db = setup().await;
    let books = book_store(&db);
    let saved = books
        .save(book("Clean Code", BookType::Computer))
        .await
        .unwrap();

    books.delete(saved.clone()).await.unwrap();
    assert!(books.find_by_id(1).await.unwrap().is_none());

    let err = books.delete(saved).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_of_absent_rows_is_not_found() {
    let db = setup().await;
    let books = book_store(&db);

    let err = books.delete_by_id(999).await.unwrap_err();
    assert_eq!(err.to_string(), "Book 999 not found");

    let unsaved = book("Clean Code", BookType::Computer);
    let err = books.delete(unsaved).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn count_matches_find_all() {
    let db = setup().await;
    let books = book_store(&db);
    assert_eq!(books.count().await.unwrap(), 0);

    books
        .save_all(vec![
            book("A", BookType::Computer),
            book("B", BookType::Economy),
            book("C", BookType::Society),
        ])
        .await
        .unwrap();

    let all = books.find_all().await.unwrap();
    assert_eq!(books.count().await.unwrap(), all.len() as u64);
    assert_eq!(all.len(), 3);

    assert_eq!(books.delete_all().await.unwrap(), 3);
    assert_eq!(books.count().await.unwrap(), 0);
}

async fn five_books(books: &impl BookRepository) {
    books
        .save_all(
            ["E", "C", "A", "D", "B"]
                .into_iter()
                .map(|name| book(name, BookType::Language))
                .collect(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn pages_follow_primary_key_by_default() {
    let db = setup().await;
    let books = book_store(&db);
    five_books(&books).await;

    let first = books.find_page(PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.total_pages, 3);
    assert!(first.has_next());
    let names: Vec<_> = first.items.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["E", "C"]);

    let last = books.find_page(PageRequest::new(3, 2)).await.unwrap();
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_next());

    let beyond = books.find_page(PageRequest::new(4, 2)).await.unwrap();
    assert!(beyond.items.is_empty());
}

#[tokio::test]
async fn pages_and_lists_follow_requested_sort() {
    let db = setup().await;
    let books = book_store(&db);
    five_books(&books).await;

    let page = books
        .find_page(PageRequest::new(1, 3).sorted(Sort::desc("name")))
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["E", "D", "C"]);

    let sorted = books.find_all_sorted(Sort::asc("name")).await.unwrap();
    let names: Vec<_> = sorted.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn find_all_follows_primary_key() {
    let db = setup().await;
    let books = book_store(&db);
    five_books(&books).await;

    let ids: Vec<_> = books
        .find_all()
        .await
        .unwrap()
        .iter()
        .filter_map(|b| b.id)
        .collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn page_beyond_addressable_rows_is_rejected() {
    let db = setup().await;
    let books = book_store(&db);
    five_books(&books).await;

    let err = books
        .find_page(PageRequest::new(u64::MAX, 50))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn unknown_sort_property_is_rejected() {
    let db = setup().await;
    let books = book_store(&db);

    let err = books
        .find_all_sorted(Sort::asc("publisher"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn stream_walks_every_entity_and_restarts() {
    let db = setup().await;
    let books = book_store(&db);
    five_books(&books).await;

    let streamed: Vec<Book> = stream_all::<Book, i64, _>(&books, 2)
        .try_collect()
        .await
        .unwrap();
    let ids: Vec<_> = streamed.iter().filter_map(|b| b.id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);

    let again: Vec<Book> = stream_all::<Book, i64, _>(&books, 10)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(again, streamed);
}

#[tokio::test]
async fn stream_of_empty_store_ends_immediately() {
    let db = setup().await;
    let books = book_store(&db);

    let streamed: Vec<Book> = stream_all::<Book, i64, _>(&books, 3)
        .try_collect()
        .await
        .unwrap();
    assert!(streamed.is_empty());
}

#[tokio::test]
async fn stats_count_books_per_type() {
    let db = setup().await;
    let books = book_store(&db);
    books
        .save_all(vec![
            book("A", BookType::Computer),
            book("B", BookType::Science),
            book("C", BookType::Computer),
        ])
        .await
        .unwrap();

    let stats = books.stats().await.unwrap();

    assert_eq!(
        stats,
        vec![
            BookStat {
                book_type: BookType::Computer,
                count: 2,
            },
            BookStat {
                book_type: BookType::Science,
                count: 1,
            },
        ]
    );
}
