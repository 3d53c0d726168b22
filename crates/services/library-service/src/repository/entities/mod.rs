//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models. Each
//! module also binds its domain type to the table through `Persistable`.

pub mod book;
pub mod user;
pub mod user_loan_history;
