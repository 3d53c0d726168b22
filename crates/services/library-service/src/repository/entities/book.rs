//! Book database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use common::{AppError, AppResult};
use domain::{Book, BookType};

use crate::repository::base::Persistable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Book titles are unique, which keeps `find_by_name` single-valued
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub book_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Persistable for Book {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Id = i64;

    const NAME: &'static str = "Book";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_model(model: Model) -> AppResult<Self> {
        let book_type: BookType = model.book_type.parse().map_err(|_| {
            AppError::internal(format!(
                "invalid book type `{}` stored for book {}",
                model.book_type, model.id
            ))
        })?;

        Ok(Book {
            id: Some(model.id),
            name: model.name,
            book_type,
        })
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: self.id.map_or(NotSet, Set),
            name: Set(self.name.clone()),
            book_type: Set(self.book_type.as_str().to_string()),
        }
    }
}
