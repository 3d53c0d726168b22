//! Loan history repository implementation.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DatabaseConnection};

use common::AppResult;
use domain::{LoanStatus, UserLoanHistory};

use super::base::{EntityRepository, SeaRepository};
use super::entities::user_loan_history;

/// Loan history repository trait for dependency injection.
#[async_trait]
pub trait UserLoanHistoryRepository: EntityRepository<UserLoanHistory, i64> {
    /// Oldest history for the book in the given status
    async fn find_by_book_name_and_status(
        &self,
        book_name: &str,
        status: LoanStatus,
    ) -> AppResult<Option<UserLoanHistory>>;

    /// Oldest history of one user for the book in the given status
    async fn find_by_user_id_and_book_name_and_status(
        &self,
        user_id: i64,
        book_name: &str,
        status: LoanStatus,
    ) -> AppResult<Option<UserLoanHistory>>;

    /// Every history of one user, oldest first
    async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<UserLoanHistory>>;

    async fn count_by_status(&self, status: LoanStatus) -> AppResult<u64>;
}

pub type UserLoanHistoryStore<H = Arc<DatabaseConnection>> = SeaRepository<UserLoanHistory, H>;

fn book_in_status(book_name: &str, status: LoanStatus) -> Condition {
    Condition::all()
        .add(user_loan_history::Column::BookName.eq(book_name))
        .add(user_loan_history::Column::Status.eq(status.as_str()))
}

#[async_trait]
impl<H> UserLoanHistoryRepository for SeaRepository<UserLoanHistory, H>
where
    H: Deref + Send + Sync,
    H::Target: ConnectionTrait + Sync + Sized,
{
    async fn find_by_book_name_and_status(
        &self,
        book_name: &str,
        status: LoanStatus,
    ) -> AppResult<Option<UserLoanHistory>> {
        self.find_one_by(book_in_status(book_name, status)).await
    }

    async fn find_by_user_id_and_book_name_and_status(
        &self,
        user_id: i64,
        book_name: &str,
        status: LoanStatus,
    ) -> AppResult<Option<UserLoanHistory>> {
        let condition = book_in_status(book_name, status)
            .add(user_loan_history::Column::UserId.eq(user_id));
        self.find_one_by(condition).await
    }

    async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<UserLoanHistory>> {
        self.find_all_by(user_loan_history::Column::UserId.eq(user_id))
            .await
    }

    async fn count_by_status(&self, status: LoanStatus) -> AppResult<u64> {
        self.count_by(user_loan_history::Column::Status.eq(status.as_str()))
            .await
    }
}

#[cfg(any(test, feature = "test-utils"))]
mockall::mock! {
    pub UserLoanHistoryRepository {}

    #[async_trait]
    impl EntityRepository<UserLoanHistory, i64> for UserLoanHistoryRepository {
        async fn save(&self, entity: UserLoanHistory) -> AppResult<UserLoanHistory>;
        async fn save_all(&self, entities: Vec<UserLoanHistory>) -> AppResult<Vec<UserLoanHistory>>;
        async fn find_by_id(&self, id: i64) -> AppResult<Option<UserLoanHistory>>;
        async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
        async fn find_all(&self) -> AppResult<Vec<UserLoanHistory>>;
        async fn find_all_sorted(&self, sort: common::Sort) -> AppResult<Vec<UserLoanHistory>>;
        async fn find_page(
            &self,
            request: common::PageRequest,
        ) -> AppResult<common::Page<UserLoanHistory>>;
        async fn count(&self) -> AppResult<u64>;
        async fn delete(&self, entity: UserLoanHistory) -> AppResult<()>;
        async fn delete_by_id(&self, id: i64) -> AppResult<()>;
        async fn delete_all(&self) -> AppResult<u64>;
    }

    #[async_trait]
    impl UserLoanHistoryRepository for UserLoanHistoryRepository {
        async fn find_by_book_name_and_status(
            &self,
            book_name: &str,
            status: LoanStatus,
        ) -> AppResult<Option<UserLoanHistory>>;
        async fn find_by_user_id_and_book_name_and_status(
            &self,
            user_id: i64,
            book_name: &str,
            status: LoanStatus,
        ) -> AppResult<Option<UserLoanHistory>>;
        async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<UserLoanHistory>>;
        async fn count_by_status(&self, status: LoanStatus) -> AppResult<u64>;
    }
}
