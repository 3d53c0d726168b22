//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::book::Book;
use crate::error::{DomainError, DomainResult};
use crate::loan_history::UserLoanHistory;

/// Library member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub age: Option<i32>,
}

impl User {
    /// Create a new, not yet persisted user
    pub fn new(name: impl Into<String>, age: Option<i32>) -> DomainResult<Self> {
        let name = name.into();
        ensure_name(&name)?;

        Ok(Self {
            id: None,
            name,
            age,
        })
    }

    /// Update user's name
    pub fn update_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        ensure_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Start a loan of `book` for this user.
    ///
    /// The user must already be stored, since the history row references it.
    pub fn loan_book(&self, book: &Book) -> DomainResult<UserLoanHistory> {
        let user_id = self
            .id
            .ok_or_else(|| DomainError::validation("user must be saved before borrowing"))?;
        Ok(UserLoanHistory::loaned(user_id, book.name.clone()))
    }
}

fn ensure_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("user name must not be blank"));
    }
    Ok(())
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreateRequest {
    #[validate(
        length(min = 1, max = 255, message = "name must be 1-255 characters"),
        custom(function = "crate::book::validate_not_blank")
    )]
    pub name: String,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
}

impl UserCreateRequest {
    pub fn new(name: impl Into<String>, age: Option<i32>) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// User rename data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserUpdateRequest {
    pub id: i64,
    #[validate(
        length(min = 1, max = 255, message = "name must be 1-255 characters"),
        custom(function = "crate::book::validate_not_blank")
    )]
    pub name: String,
}

impl UserUpdateRequest {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
