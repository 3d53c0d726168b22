//! Unit of Work: repository access and transaction boundaries.
//!
//! Repositories handed out by `UnitOfWork` run on the shared pool, one
//! statement per call. Work that must succeed or fail as a whole goes through
//! `transaction`, whose `TransactionContext` hands out the same repositories
//! bound to a single database transaction.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    IsolationLevel, TransactionTrait,
};

use common::{AppError, AppResult};

use crate::repository::{
    BookRepository, BookStore, UserLoanHistoryRepository, UserLoanHistoryStore, UserRepository,
    UserStore,
};

/// Boxed future returned by transactional closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to the generic method.
/// Transactional workflows are written against the repository traits, so
/// tests drive them with repository mocks instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn books(&self) -> Arc<dyn BookRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    fn loan_histories(&self) -> Arc<dyn UserLoanHistoryRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access inside one transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn books(&self) -> BookStore<&'a DatabaseTransaction> {
        BookStore::new(self.txn)
    }

    pub fn users(&self) -> UserStore<&'a DatabaseTransaction> {
        UserStore::new(self.txn)
    }

    pub fn loan_histories(&self) -> UserLoanHistoryStore<&'a DatabaseTransaction> {
        UserLoanHistoryStore::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Arc<DatabaseConnection>,
    books: Arc<BookStore>,
    users: Arc<UserStore>,
    loan_histories: Arc<UserLoanHistoryStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            books: Arc::new(BookStore::new(db.clone())),
            users: Arc::new(UserStore::new(db.clone())),
            loan_histories: Arc::new(UserLoanHistoryStore::new(db.clone())),
            db,
        }
    }

    /// Isolation and access mode for new transactions
    fn transaction_config(&self) -> (Option<IsolationLevel>, Option<AccessMode>) {
        // SQLite serializes writers and has no per-transaction settings
        match self.db.get_database_backend() {
            DbBackend::Sqlite => (None, None),
            _ => (
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            ),
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn books(&self) -> Arc<dyn BookRepository> {
        self.books.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn loan_histories(&self) -> Arc<dyn UserLoanHistoryRepository> {
        self.loan_histories.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let (isolation, access) = self.transaction_config();
        let txn = self
            .db
            .begin_with_config(isolation, access)
            .await
            .map_err(AppError::from)?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rolling back transaction");
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Run a block inside a transaction of the given unit of work.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
