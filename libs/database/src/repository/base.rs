use sea_orm::sea_query::IntoCondition;
use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter};
use std::marker::PhantomData;

use super::{ChangeSet, IncludePaths, Pending, QueryOptions, RepositoryEntity, RepositoryResult};

/// Generic data access for one entity.
///
/// Reads go straight to the database. Writes are only staged on the shared
/// [`ChangeSet`] and reach the database when that set is committed.
pub struct BaseRepository<E: RepositoryEntity> {
    db: DatabaseConnection,
    changes: ChangeSet,
    _entity: PhantomData<fn() -> E>,
}

impl<E: RepositoryEntity> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            changes: self.changes.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> BaseRepository<E>
where
    E: RepositoryEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync,
{
    pub fn new(db: DatabaseConnection, changes: ChangeSet) -> Self {
        Self {
            db,
            changes,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// All rows matching `options`, with the requested relations loaded.
    pub async fn get_all(&self, options: QueryOptions<E>) -> RepositoryResult<Vec<E::Record>> {
        let (select, include) = options.into_select();
        let rows = select.all(&self.db).await?;
        E::load(&self.db, rows, &include).await
    }

    /// First row matching `filter`, or `None`.
    pub async fn get<F: IntoCondition>(
        &self,
        filter: F,
        include: impl Into<IncludePaths>,
    ) -> RepositoryResult<Option<E::Record>> {
        let Some(row) = E::find().filter(filter).one(&self.db).await? else {
            return Ok(None);
        };
        let include = include.into();
        Ok(E::load(&self.db, vec![row], &include).await?.into_iter().next())
    }

    pub fn add(&self, model: E::Active) -> Pending<E::Model> {
        self.changes.stage_insert::<E>(model)
    }

    /// Stages a full-record update; every column of `model` is written.
    pub fn update(&self, model: E::Model) -> Pending<E::Model> {
        self.changes.stage_update::<E>(model)
    }

    pub fn remove(&self, model: E::Model) {
        self.changes.stage_delete::<E>(model);
    }

    pub fn remove_range(&self, models: impl IntoIterator<Item = E::Model>) {
        for model in models {
            self.remove(model);
        }
    }
}
