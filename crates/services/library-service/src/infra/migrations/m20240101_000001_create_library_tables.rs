//! Migration: Create book, users and user_loan_history tables.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

use domain::MAX_NAME_LENGTH;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Surrogate key column. SQLite only auto-increments an `integer` key.
fn id_column<T: IntoIden>(backend: DbBackend, name: T) -> ColumnDef {
    let mut column = ColumnDef::new(name);
    match backend {
        DbBackend::Sqlite => column.integer(),
        _ => column.big_integer(),
    };
    column.not_null().auto_increment().primary_key().to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .create_table(
                Table::create()
                    .table(Book::Table)
                    .if_not_exists()
                    .col(id_column(backend, Book::Id))
                    .col(
                        ColumnDef::new(Book::Name)
                            .string_len(MAX_NAME_LENGTH)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Book::Type).string_len(32).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_column(backend, Users::Id))
                    .col(ColumnDef::new(Users::Name).string_len(MAX_NAME_LENGTH).not_null())
                    .col(ColumnDef::new(Users::Age).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserLoanHistory::Table)
                    .if_not_exists()
                    .col(id_column(backend, UserLoanHistory::Id))
                    .col(ColumnDef::new(UserLoanHistory::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UserLoanHistory::BookName)
                            .string_len(MAX_NAME_LENGTH)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserLoanHistory::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(UserLoanHistory::LoanedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserLoanHistory::ReturnedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_loan_history_user")
                            .from(UserLoanHistory::Table, UserLoanHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Loan checks look up a book's open history by name and status
        manager
            .create_index(
                Index::create()
                    .name("idx_user_loan_history_book_status")
                    .table(UserLoanHistory::Table)
                    .col(UserLoanHistory::BookName)
                    .col(UserLoanHistory::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserLoanHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Book::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Book {
    Table,
    Id,
    Name,
    Type,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Age,
}

#[derive(Iden)]
enum UserLoanHistory {
    Table,
    Id,
    UserId,
    BookName,
    Status,
    LoanedAt,
    ReturnedAt,
}
