//! User service - Handles user-related business logic.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use common::{AppResult, OptionExt};
use domain::{DomainError, User, UserCreateRequest, UserLoanHistoryResponse, UserUpdateRequest};

use crate::infra::UnitOfWork;
use crate::repository::UserRepository;
use crate::with_transaction;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn save_user(&self, request: UserCreateRequest) -> AppResult<User>;

    /// Every user, ordered by id
    async fn get_users(&self) -> AppResult<Vec<User>>;

    async fn update_user_name(&self, request: UserUpdateRequest) -> AppResult<User>;

    /// Delete the first user with this name together with their loan histories
    async fn delete_user(&self, name: &str) -> AppResult<()>;

    /// Each user with the books they borrowed and whether each came back
    async fn get_user_loan_histories(&self) -> AppResult<Vec<UserLoanHistoryResponse>>;
}

/// Concrete implementation of UserService.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn save_user(&self, request: UserCreateRequest) -> AppResult<User> {
        request.validate().map_err(DomainError::from)?;

        let user = self
            .uow
            .users()
            .save(User::new(request.name, request.age)?)
            .await?;
        tracing::info!(user_id = ?user.id, name = %user.name, "User saved");
        Ok(user)
    }

    async fn get_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().find_all_sorted(common::Sort::asc("id")).await
    }

    async fn update_user_name(&self, request: UserUpdateRequest) -> AppResult<User> {
        with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            rename_user(&users, request).await
        })
    }

    async fn delete_user(&self, name: &str) -> AppResult<()> {
        let name = name.to_string();
        with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            remove_user(&users, name).await
        })
    }

    async fn get_user_loan_histories(&self) -> AppResult<Vec<UserLoanHistoryResponse>> {
        let rows = self.uow.users().find_all_with_histories().await?;
        Ok(rows
            .iter()
            .map(|(user, histories)| UserLoanHistoryResponse::of(user, histories))
            .collect())
    }
}

// =============================================================================
// Workflows
// =============================================================================

async fn rename_user(users: &dyn UserRepository, request: UserUpdateRequest) -> AppResult<User> {
    request.validate().map_err(DomainError::from)?;

    let mut user = users
        .find_by_id(request.id)
        .await?
        .ok_or_not_found(format!("User {}", request.id))?;
    user.update_name(request.name)?;

    users.save(user).await
}

async fn remove_user(users: &dyn UserRepository, name: String) -> AppResult<()> {
    let user = users
        .find_by_name(&name)
        .await?
        .ok_or_not_found(format!("User `{}`", name))?;

    users.delete(user).await?;
    tracing::info!(name = %name, "User deleted");
    Ok(())
}
