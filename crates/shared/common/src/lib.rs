//! Common utilities shared across the library services.
//!
//! This crate provides:
//! - Unified error handling for repositories and services
//! - Configuration structures
//! - Paging and sorting requests

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use pagination::{
    Direction, Page, PageRequest, Sort, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
