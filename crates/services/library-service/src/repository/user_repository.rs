//! User repository implementation.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder};

use common::AppResult;
use domain::{User, UserLoanHistory};

use super::base::{EntityRepository, Persistable, SeaRepository};
use super::entities::user::{self, Entity as UserEntity};
use super::entities::user_loan_history::{self, Entity as LoanHistoryEntity};

/// User repository trait for dependency injection.
#[async_trait]
pub trait UserRepository: EntityRepository<User, i64> {
    /// First user (lowest id) with exactly this name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// Every user together with their loan histories, ordered by user id
    async fn find_all_with_histories(&self) -> AppResult<Vec<(User, Vec<UserLoanHistory>)>>;
}

pub type UserStore<H = Arc<DatabaseConnection>> = SeaRepository<User, H>;

#[async_trait]
impl<H> UserRepository for SeaRepository<User, H>
where
    H: Deref + Send + Sync,
    H::Target: ConnectionTrait + Sync + Sized,
{
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        self.find_one_by(user::Column::Name.eq(name)).await
    }

    async fn find_all_with_histories(&self) -> AppResult<Vec<(User, Vec<UserLoanHistory>)>> {
        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .find_with_related(LoanHistoryEntity)
            .order_by_asc(user_loan_history::Column::Id)
            .all(self.db())
            .await?;

        rows.into_iter()
            .map(|(user, histories)| {
                let histories = histories
                    .into_iter()
                    .map(UserLoanHistory::from_model)
                    .collect::<AppResult<Vec<_>>>()?;
                Ok((User::from(user), histories))
            })
            .collect()
    }
}

#[cfg(any(test, feature = "test-utils"))]
mockall::mock! {
    pub UserRepository {}

    #[async_trait]
    impl EntityRepository<User, i64> for UserRepository {
        async fn save(&self, entity: User) -> AppResult<User>;
        async fn save_all(&self, entities: Vec<User>) -> AppResult<Vec<User>>;
        async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
        async fn exists_by_id(&self, id: i64) -> AppResult<bool>;
        async fn find_all(&self) -> AppResult<Vec<User>>;
        async fn find_all_sorted(&self, sort: common::Sort) -> AppResult<Vec<User>>;
        async fn find_page(&self, request: common::PageRequest) -> AppResult<common::Page<User>>;
        async fn count(&self) -> AppResult<u64>;
        async fn delete(&self, entity: User) -> AppResult<()>;
        async fn delete_by_id(&self, id: i64) -> AppResult<()>;
        async fn delete_all(&self) -> AppResult<u64>;
    }

    #[async_trait]
    impl UserRepository for UserRepository {
        async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;
        async fn find_all_with_histories(&self) -> AppResult<Vec<(User, Vec<UserLoanHistory>)>>;
    }
}
