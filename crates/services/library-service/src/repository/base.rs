//! Generic repository contract and its SeaORM adapter.
//!
//! `EntityRepository<E, K>` is the persistence contract every store offers:
//! save, lookup by key, listing, paging, counting and deletion. `SeaRepository`
//! implements it once for any domain type bound to a table via `Persistable`.
//! Additional lookups by non-key attributes are declared as traits on top of
//! the contract and implemented with the explicit query specifications
//! (`find_one_by`, `find_all_by`, `count_by`) of the adapter.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Deref;
use std::str::FromStr;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sea_orm::sea_query::IntoCondition;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, EntityTrait, FromQueryResult,
    IntoActiveModel, Iterable, Order, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait,
    QueryFilter, QueryOrder, Select,
};

use common::{AppError, AppResult, Direction, Page, PageRequest, Sort};

/// Binds a domain type to its SeaORM table.
///
/// The id is `None` for entities that have never been stored; the store
/// assigns it on first save.
pub trait Persistable: Clone + Send + Sync + Sized + 'static {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: FromQueryResult + IntoActiveModel<Self::ActiveModel> + Send + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;
    type Id: Clone
        + Debug
        + Send
        + Sync
        + Into<<<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>
        + 'static;

    /// Entity name used in errors and logs
    const NAME: &'static str;

    fn id(&self) -> Option<Self::Id>;

    /// Rebuild the domain value from a stored row
    fn from_model(model: Self::Model) -> AppResult<Self>;

    /// Every column set; the primary key is left unset for new entities
    fn to_active_model(&self) -> Self::ActiveModel;
}

/// Persistence contract for entity type `E` keyed by `K`.
///
/// Each call is a single request against the store. Nothing is batched or
/// ordered across calls unless the caller wraps them in a transaction.
#[async_trait]
pub trait EntityRepository<E, K>: Send + Sync
where
    E: Send + 'static,
    K: Send + 'static,
{
    /// Insert the entity, or update it when its id is already stored.
    ///
    /// An id that is not stored is discarded and the insert gets a fresh one.
    /// Returns the stored state with the id populated. A broken unique or
    /// foreign-key constraint fails with `ConstraintViolation`.
    async fn save(&self, entity: E) -> AppResult<E>;

    /// Save each entity in order
    async fn save_all(&self, entities: Vec<E>) -> AppResult<Vec<E>>;

    async fn find_by_id(&self, id: K) -> AppResult<Option<E>>;

    async fn exists_by_id(&self, id: K) -> AppResult<bool>;

    /// Every stored entity, ordered by primary key
    async fn find_all(&self) -> AppResult<Vec<E>>;

    async fn find_all_sorted(&self, sort: Sort) -> AppResult<Vec<E>>;

    /// One page; ordered by the requested sort, else by primary key
    async fn find_page(&self, request: PageRequest) -> AppResult<Page<E>>;

    async fn count(&self) -> AppResult<u64>;

    /// Remove a stored entity. Fails with `NotFound` if it is not stored.
    async fn delete(&self, entity: E) -> AppResult<()>;

    /// Remove by key. Fails with `NotFound` if nothing was removed.
    async fn delete_by_id(&self, id: K) -> AppResult<()>;

    /// Remove everything, returning the number of removed rows
    async fn delete_all(&self) -> AppResult<u64>;
}

/// Lazily walk every entity, fetching `per_page` rows at a time.
///
/// The stream is finite; calling this again starts a fresh walk.
pub fn stream_all<'r, E, K, R>(repo: &'r R, per_page: u64) -> BoxStream<'r, AppResult<E>>
where
    R: EntityRepository<E, K> + ?Sized,
    E: Send + 'static,
    K: Send + 'static,
{
    stream::try_unfold(Some(1u64), move |next| async move {
        let Some(page) = next else {
            return Ok(None);
        };

        let result = repo.find_page(PageRequest::new(page, per_page)).await?;
        let following = result.has_next().then_some(page + 1);
        let items = stream::iter(result.items.into_iter().map(Ok::<E, AppError>));
        Ok::<_, AppError>(Some((items, following)))
    })
    .try_flatten()
    .boxed()
}

/// `EntityRepository` over SeaORM.
///
/// `H` is any handle dereferencing to a connection: a shared pool
/// (`Arc<DatabaseConnection>`) or a borrowed transaction.
pub struct SeaRepository<E, H> {
    db: H,
    _entity: PhantomData<fn() -> E>,
}

impl<E, H> SeaRepository<E, H> {
    /// Create new repository instance
    pub fn new(db: H) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E, H> SeaRepository<E, H>
where
    E: Persistable,
    H: Deref + Send + Sync,
    H::Target: ConnectionTrait + Sync + Sized,
    <E::Entity as EntityTrait>::Column: FromStr,
{
    /// Get database connection reference
    pub fn db(&self) -> &H::Target {
        &self.db
    }

    /// At most one entity matching `filter`
    pub async fn find_one_by<F>(&self, filter: F) -> AppResult<Option<E>>
    where
        F: IntoCondition + Send,
    {
        let select = by_primary_key::<E>(E::Entity::find().filter(filter));
        let model = select.one(self.db()).await?;
        model.map(E::from_model).transpose()
    }

    /// Every entity matching `filter`, ordered by primary key
    pub async fn find_all_by<F>(&self, filter: F) -> AppResult<Vec<E>>
    where
        F: IntoCondition + Send,
    {
        let select = by_primary_key::<E>(E::Entity::find().filter(filter));
        let models = select.all(self.db()).await?;
        models.into_iter().map(E::from_model).collect()
    }

    /// Number of entities matching `filter`
    pub async fn count_by<F>(&self, filter: F) -> AppResult<u64>
    where
        F: IntoCondition + Send,
    {
        E::Entity::find()
            .filter(filter)
            .count(self.db())
            .await
            .map_err(Into::into)
    }

    fn sorted(sort: &Sort) -> AppResult<Select<E::Entity>> {
        let column = <E::Entity as EntityTrait>::Column::from_str(&sort.property).map_err(|_| {
            AppError::validation(format!(
                "cannot sort {} by unknown property `{}`",
                E::NAME,
                sort.property
            ))
        })?;
        let order = match sort.direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };

        // Key as tie-breaker keeps pages stable over duplicate sort values
        Ok(by_primary_key::<E>(E::Entity::find().order_by(column, order)))
    }
}

fn by_primary_key<E: Persistable>(select: Select<E::Entity>) -> Select<E::Entity> {
    <E::Entity as EntityTrait>::PrimaryKey::iter()
        .fold(select, |select, key| select.order_by_asc(key.into_column()))
}

#[async_trait]
impl<E, H> EntityRepository<E, E::Id> for SeaRepository<E, H>
where
    E: Persistable,
    H: Deref + Send + Sync,
    H::Target: ConnectionTrait + Sync + Sized,
    <E::Entity as EntityTrait>::Column: FromStr,
{
    async fn save(&self, entity: E) -> AppResult<E> {
        let stored = match entity.id() {
            Some(id) => self.exists_by_id(id).await?,
            None => false,
        };

        let mut active = entity.to_active_model();
        let model = if stored {
            tracing::debug!(entity = E::NAME, id = ?entity.id(), "Updating");
            active.update(self.db()).await?
        } else {
            // Unknown ids are not reused; the store generates a fresh one
            for key in <E::Entity as EntityTrait>::PrimaryKey::iter() {
                active.not_set(key.into_column());
            }
            tracing::debug!(entity = E::NAME, "Inserting");
            active.insert(self.db()).await?
        };

        E::from_model(model)
    }

    async fn save_all(&self, entities: Vec<E>) -> AppResult<Vec<E>> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            saved.push(self.save(entity).await?);
        }
        Ok(saved)
    }

    async fn find_by_id(&self, id: E::Id) -> AppResult<Option<E>> {
        let model = E::Entity::find_by_id(id).one(self.db()).await?;
        model.map(E::from_model).transpose()
    }

    async fn exists_by_id(&self, id: E::Id) -> AppResult<bool> {
        let found = E::Entity::find_by_id(id).count(self.db()).await?;
        Ok(found > 0)
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        let models = by_primary_key::<E>(E::Entity::find()).all(self.db()).await?;
        models.into_iter().map(E::from_model).collect()
    }

    async fn find_all_sorted(&self, sort: Sort) -> AppResult<Vec<E>> {
        let models = Self::sorted(&sort)?.all(self.db()).await?;
        models.into_iter().map(E::from_model).collect()
    }

    async fn find_page(&self, request: PageRequest) -> AppResult<Page<E>> {
        let select = match &request.sort {
            Some(sort) => Self::sorted(sort)?,
            None => by_primary_key::<E>(E::Entity::find()),
        };

        if request.offset().is_none() {
            return Err(AppError::validation(format!(
                "page {} of {} per page is out of range",
                request.page,
                request.limit()
            )));
        }

        let paginator = select.paginate(self.db(), request.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(request.index()).await?;
        let items = models
            .into_iter()
            .map(E::from_model)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(items, request.index() + 1, request.limit(), total))
    }

    async fn count(&self) -> AppResult<u64> {
        E::Entity::find()
            .count(self.db())
            .await
            .map_err(Into::into)
    }

    async fn delete(&self, entity: E) -> AppResult<()> {
        match entity.id() {
            Some(id) => self.delete_by_id(id).await,
            None => Err(AppError::not_found(format!("Unsaved {}", E::NAME))),
        }
    }

    async fn delete_by_id(&self, id: E::Id) -> AppResult<()> {
        let result = E::Entity::delete_by_id(id.clone())
            .exec(self.db())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(format!("{} {:?}", E::NAME, id)));
        }

        tracing::debug!(entity = E::NAME, id = ?id, "Deleted");
        Ok(())
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = E::Entity::delete_many().exec(self.db()).await?;
        tracing::debug!(entity = E::NAME, rows = result.rows_affected, "Deleted all");
        Ok(result.rows_affected)
    }
}
