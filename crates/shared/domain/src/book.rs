//! Book domain entity and related types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::constants::{
    BOOK_TYPE_COMPUTER, BOOK_TYPE_ECONOMY, BOOK_TYPE_LANGUAGE, BOOK_TYPE_SCIENCE,
    BOOK_TYPE_SOCIETY, VALID_BOOK_TYPES,
};
use crate::error::{DomainError, DomainResult};

/// Book categories, persisted by name rather than by ordinal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookType {
    #[default]
    Computer,
    Economy,
    Society,
    Language,
    Science,
}

impl BookType {
    /// Stored representation of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            BookType::Computer => BOOK_TYPE_COMPUTER,
            BookType::Economy => BOOK_TYPE_ECONOMY,
            BookType::Society => BOOK_TYPE_SOCIETY,
            BookType::Language => BOOK_TYPE_LANGUAGE,
            BookType::Science => BOOK_TYPE_SCIENCE,
        }
    }
}

impl FromStr for BookType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            BOOK_TYPE_COMPUTER => Ok(BookType::Computer),
            BOOK_TYPE_ECONOMY => Ok(BookType::Economy),
            BOOK_TYPE_SOCIETY => Ok(BookType::Society),
            BOOK_TYPE_LANGUAGE => Ok(BookType::Language),
            BOOK_TYPE_SCIENCE => Ok(BookType::Science),
            other => Err(DomainError::validation(format!(
                "unknown book type `{}`, expected one of {}",
                other,
                VALID_BOOK_TYPES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Book domain entity
///
/// `id` is `None` until the book has been persisted; the store assigns it
/// and it never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i64>,
    pub name: String,
    pub book_type: BookType,
}

impl Book {
    /// Create a new, not yet persisted book
    pub fn new(name: impl Into<String>, book_type: BookType) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("book name must not be blank"));
        }

        Ok(Self {
            id: None,
            name,
            book_type,
        })
    }
}

/// Book registration data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookRequest {
    /// Book title, unique across the catalogue
    #[validate(
        length(min = 1, max = 255, message = "name must be 1-255 characters"),
        custom(function = "crate::book::validate_not_blank")
    )]
    pub name: String,
    /// Book category
    #[serde(rename = "type", default)]
    pub book_type: BookType,
}

impl BookRequest {
    pub fn new(name: impl Into<String>, book_type: BookType) -> Self {
        Self {
            name: name.into(),
            book_type,
        }
    }
}

/// Number of books per type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookStat {
    #[serde(rename = "type")]
    pub book_type: BookType,
    pub count: i64,
}

/// Reject names made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_book_has_no_id() {
        let book = Book::new("Clean Code", BookType::Computer).unwrap();
        assert!(book.id.is_none());
        assert_eq!(book.name, "Clean Code");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Book::new("   ", BookType::Science).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn book_type_parses_case_insensitively() {
        assert_eq!("economy".parse::<BookType>().unwrap(), BookType::Economy);
        assert_eq!(" LANGUAGE ".parse::<BookType>().unwrap(), BookType::Language);
        assert!("poetry".parse::<BookType>().is_err());
    }

    #[test]
    fn book_type_round_trips_through_storage_name() {
        for kind in [
            BookType::Computer,
            BookType::Economy,
            BookType::Society,
            BookType::Language,
            BookType::Science,
        ] {
            assert_eq!(kind.as_str().parse::<BookType>().unwrap(), kind);
        }
    }

    #[test]
    fn request_validation_rejects_blank_names() {
        let request = BookRequest::new("  ", BookType::Computer);
        let err = DomainError::from(request.validate().unwrap_err());
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(BookRequest::new("Spring Boot", BookType::Computer)
            .validate()
            .is_ok());
    }
}
