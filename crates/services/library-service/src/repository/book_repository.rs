//! Book repository: the generic contract plus lookups by name and type.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryOrder,
    QuerySelect,
};

use common::{AppError, AppResult};
use domain::{Book, BookStat, BookType};

use super::base::{EntityRepository, SeaRepository};
use super::entities::book::{self, Entity as BookEntity};

/// Book repository trait for dependency injection.
#[async_trait]
pub trait BookRepository: EntityRepository<Book, i64> {
    /// The book with exactly this name, if any. Names are unique.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Book>>;

    /// Number of books per type, ordered by type
    async fn stats(&self) -> AppResult<Vec<BookStat>>;
}

/// Book store over a pooled connection or a transaction
pub type BookStore<H = Arc<DatabaseConnection>> = SeaRepository<Book, H>;

#[derive(Debug, FromQueryResult)]
struct BookTypeCount {
    book_type: String,
    count: i64,
}

#[async_trait]
impl<H> BookRepository for SeaRepository<Book, H>
where
    H: Deref + Send + Sync,
    H::Target: ConnectionTrait + Sync + Sized,
{
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Book>> {
        self.find_one_by(book::Column::Name.eq(name)).await
    }

    async fn stats(&self) -> AppResult<Vec<BookStat>> {
        let rows = BookEntity::find()
            .select_only()
            .column_as(book::Column::BookType, "book_type")
            .column_as(Expr::col(book::Column::Id).count(), "count")
            .group_by(book::Column::BookType)
            .order_by_asc(book::Column::BookType)
            .into_model::<BookTypeCount>()
            .all(self.db())
            .await?;

        rows.into_iter()
            .map(|row| {
                let book_type: BookType = row.book_type.parse().map_err(|_| {
                    AppError::internal(format!("invalid book type `{}` stored", row.book_type))
                })?;
                Ok(BookStat {
                    book_type,
                    count: row.count,
                })
            })
            .collect()
    }
}

#[cfg(any(test, feature = "test-utils"))]
mockall::mock! {
    pub BookRepository {}

    #[async_trait]
    impl EntityRepository<Book, i64> for BookRepository {
        async fn save(&self, entity: Book) -> AppResult<Book>;
        async fn save_all(&self, entities: Vec<Book>) -> AppResult<Vec<Book>>;
        async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;
        async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
        async fn find_all(&self) -> AppResult<Vec<Book>>;
        async fn find_all_sorted(&self, sort: common::Sort) -> AppResult<Vec<Book>>;
        async fn find_page(&self, request: common::PageRequest) -> AppResult<common::Page<Book>>;
        async fn count(&self) -> AppResult<u64>;
        async fn delete(&self, entity: Book) -> AppResult<()>;
        async fn delete_by_id(&self, id: i64) -> AppResult<()>;
        async fn delete_all(&self) -> AppResult<u64>;
    }

    #[async_trait]
    impl BookRepository for BookRepository {
        async fn find_by_name(&self, name: &str) -> AppResult<Option<Book>>;
        async fn stats(&self) -> AppResult<Vec<BookStat>>;
    }
}
