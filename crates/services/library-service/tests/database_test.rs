//! Connection and constraint failures surfaced from the store.

mod support;

use common::{AppError, DatabaseConfig};
use domain::UserLoanHistory;
use library_service_lib::infra::Database;
use library_service_lib::repository::EntityRepository;

use crate::support::{loan_history_store, setup};

#[tokio::test]
async fn unopenable_database_is_connection_error() {
    let mut config = DatabaseConfig::with_url("sqlite:///nonexistent-dir-xyz/library.db");
    config.max_connections = 1;
    config.min_connections = 1;
    config.connect_timeout_secs = 1;

    let Err(err) = Database::connect(&config).await else {
        panic!("connecting to a missing directory should fail");
    };
    let err = AppError::from(err);

    assert!(matches!(err, AppError::Connection(_)), "got {err:?}");
    assert_eq!(err.code(), "CONNECTION_ERROR");
}

#[tokio::test]
async fn loan_for_missing_user_is_constraint_violation() {
    let db = setup().await;
    let loans = loan_history_store(&db);

    let err = loans
        .save(UserLoanHistory::loaned(99, "Spring Boot"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConstraintViolation(_)), "got {err:?}");
    assert_eq!(loans.count().await.unwrap(), 0);
}
