//! Library Service Library
//!
//! Persistence for a small lending library: a generic entity repository over
//! SeaORM, book/user/loan-history stores built on it, and the services that
//! lend and return books inside transactions.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::AppResult;

use crate::config::LibraryServiceConfig;
use crate::infra::{Database, Persistence};
use crate::service::{BookManager, UserManager};

/// Wired services over one database pool.
pub struct Library {
    pub books: BookManager<Persistence>,
    pub users: UserManager<Persistence>,
}

impl Library {
    /// Connect, apply pending migrations and wire the services.
    pub async fn connect(config: &LibraryServiceConfig) -> AppResult<Self> {
        let db = Database::connect(&config.database).await?;
        Ok(Self::from_database(&db))
    }

    pub fn from_database(db: &Database) -> Self {
        let uow = Arc::new(Persistence::new(db.get_connection()));
        Self {
            books: BookManager::new(uow.clone()),
            users: UserManager::new(uow),
        }
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &LibraryServiceConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;
    db.ping().await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Status,
}
