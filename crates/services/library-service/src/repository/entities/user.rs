//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use common::AppResult;
use domain::User;

use crate::repository::base::Persistable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_loan_history::Entity")]
    LoanHistories,
}

impl Related<super::user_loan_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanHistories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: Some(model.id),
            name: model.name,
            age: model.age,
        }
    }
}

impl Persistable for User {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Id = i64;

    const NAME: &'static str = "User";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_model(model: Model) -> AppResult<Self> {
        Ok(User::from(model))
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: self.id.map_or(NotSet, Set),
            name: Set(self.name.clone()),
            age: Set(self.age),
        }
    }
}
