//! Loan history database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use common::{AppError, AppResult};
use domain::{LoanStatus, UserLoanHistory};

use crate::repository::base::Persistable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_loan_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub book_name: String,
    pub status: String,
    pub loaned_at: DateTimeUtc,
    pub returned_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Persistable for UserLoanHistory {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Id = i64;

    const NAME: &'static str = "Loan history";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_model(model: Model) -> AppResult<Self> {
        let status: LoanStatus = model.status.parse().map_err(|_| {
            AppError::internal(format!(
                "invalid loan status `{}` stored for history {}",
                model.status, model.id
            ))
        })?;

        Ok(UserLoanHistory {
            id: Some(model.id),
            user_id: model.user_id,
            book_name: model.book_name,
            status,
            loaned_at: model.loaned_at,
            returned_at: model.returned_at,
        })
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: self.id.map_or(NotSet, Set),
            user_id: Set(self.user_id),
            book_name: Set(self.book_name.clone()),
            status: Set(self.status.as_str().to_string()),
            loaned_at: Set(self.loaned_at),
            returned_at: Set(self.returned_at),
        }
    }
}
