//! Loan history records kept per user.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{LOAN_STATUS_LOANED, LOAN_STATUS_RETURNED};
use crate::error::{DomainError, DomainResult};
use crate::user::User;

/// Loan state of a history record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Loaned,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Loaned => LOAN_STATUS_LOANED,
            LoanStatus::Returned => LOAN_STATUS_RETURNED,
        }
    }
}

impl FromStr for LoanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LOAN_STATUS_LOANED => Ok(LoanStatus::Loaned),
            LOAN_STATUS_RETURNED => Ok(LoanStatus::Returned),
            other => Err(DomainError::validation(format!("unknown loan status `{}`", other))),
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One borrowing of a book by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoanHistory {
    pub id: Option<i64>,
    pub user_id: i64,
    pub book_name: String,
    pub status: LoanStatus,
    pub loaned_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
}

impl UserLoanHistory {
    /// Open a new loan
    pub fn loaned(user_id: i64, book_name: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            book_name: book_name.into(),
            status: LoanStatus::Loaned,
            loaned_at: Utc::now(),
            returned_at: None,
        }
    }

    pub fn is_returned(&self) -> bool {
        self.status == LoanStatus::Returned
    }

    /// Close the loan
    pub fn do_return(&mut self) -> DomainResult<()> {
        if self.is_returned() {
            return Err(DomainError::validation(format!(
                "`{}` has already been returned",
                self.book_name
            )));
        }
        self.status = LoanStatus::Returned;
        self.returned_at = Some(Utc::now());
        Ok(())
    }
}

/// Loan request: `user_name` borrows `book_name`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookLoanRequest {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(length(min = 1))]
    pub book_name: String,
}

impl BookLoanRequest {
    pub fn new(user_name: impl Into<String>, book_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            book_name: book_name.into(),
        }
    }
}

/// Return request: `user_name` hands back `book_name`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookReturnRequest {
    #[validate(length(min = 1))]
    pub user_name: String,
    #[validate(length(min = 1))]
    pub book_name: String,
}

impl BookReturnRequest {
    pub fn new(user_name: impl Into<String>, book_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            book_name: book_name.into(),
        }
    }
}

/// A user together with every book they have borrowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLoanHistoryResponse {
    pub name: String,
    pub books: Vec<BookHistoryResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookHistoryResponse {
    pub name: String,
    pub is_return: bool,
}

impl UserLoanHistoryResponse {
    pub fn of(user: &User, histories: &[UserLoanHistory]) -> Self {
        Self {
            name: user.name.clone(),
            books: histories.iter().map(BookHistoryResponse::from).collect(),
        }
    }
}

impl From<&UserLoanHistory> for BookHistoryResponse {
    fn from(history: &UserLoanHistory) -> Self {
        Self {
            name: history.book_name.clone(),
            is_return: history.is_returned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returning_twice_fails() {
        let mut history = UserLoanHistory::loaned(1, "Spring Boot");
        history.do_return().unwrap();
        assert!(history.is_returned());
        assert!(history.returned_at.is_some());
        assert!(history.do_return().is_err());
    }

    #[test]
    fn loan_status_uses_storage_names() {
        assert_eq!(LoanStatus::Loaned.as_str(), "LOANED");
        assert_eq!("RETURNED".parse::<LoanStatus>().unwrap(), LoanStatus::Returned);
        assert!("loaned".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn response_lists_books_with_return_flag() {
        let user = User {
            id: Some(1),
            name: "A".to_string(),
            age: None,
        };
        let mut returned = UserLoanHistory::loaned(1, "Book 1");
        returned.do_return().unwrap();
        let open = UserLoanHistory::loaned(1, "Book 2");

        let response = UserLoanHistoryResponse::of(&user, &[returned, open]);
        assert_eq!(response.name, "A");
        assert_eq!(
            response.books,
            vec![
                BookHistoryResponse {
                    name: "Book 1".to_string(),
                    is_return: true
                },
                BookHistoryResponse {
                    name: "Book 2".to_string(),
                    is_return: false
                },
            ]
        );
    }
}
