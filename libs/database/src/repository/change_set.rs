use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityName, IntoActiveModel,
    Iterable, ModelTrait, TransactionTrait,
};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, info};

use super::{RepositoryEntity, RepositoryError, RepositoryResult};

/// Handle to a staged insert or update.
///
/// Resolves to the stored row (server-generated id and defaults included) once the
/// owning change set commits; stays empty if the commit fails or never happens.
pub struct Pending<T> {
    slot: Arc<OnceLock<T>>,
}

impl<T> Pending<T> {
    fn new() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }
}

impl<T: Clone> Pending<T> {
    pub fn saved(&self) -> Option<T> {
        self.slot.get().cloned()
    }
}

impl<T> Clone for Pending<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("saved", &self.slot.get()).finish()
    }
}

/// Hands a stored row to its [`Pending`] handle once the transaction has committed.
type Publish = Box<dyn FnOnce() + Send>;

/// One staged write, applied inside the commit transaction.
#[async_trait]
pub(crate) trait Change: Send {
    fn describe(&self) -> String;

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> RepositoryResult<Option<Publish>>;
}

struct Insert<E: RepositoryEntity> {
    model: E::Active,
    slot: Arc<OnceLock<E::Model>>,
}

struct Update<E: RepositoryEntity> {
    model: E::Model,
    slot: Arc<OnceLock<E::Model>>,
}

struct Delete<E: RepositoryEntity> {
    model: E::Model,
}

fn table_of<E: RepositoryEntity>() -> String {
    E::default().table_name().to_string()
}

#[async_trait]
impl<E> Change for Insert<E>
where
    E: RepositoryEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync,
{
    fn describe(&self) -> String {
        format!("insert into {}", table_of::<E>())
    }

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> RepositoryResult<Option<Publish>> {
        let Insert { model, slot } = *self;
        let stored = model.insert(txn).await?;
        debug!(table = %table_of::<E>(), key = %E::key_of(&stored), "Inserted row");
        Ok(Some(Box::new(move || {
            let _ = slot.set(stored);
        })))
    }
}

#[async_trait]
impl<E> Change for Update<E>
where
    E: RepositoryEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync,
{
    fn describe(&self) -> String {
        format!("update {} {}", table_of::<E>(), E::key_of(&self.model))
    }

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> RepositoryResult<Option<Publish>> {
        let Update { model, slot } = *self;
        let key = E::key_of(&model);

        // Every column is written, not only the ones that differ from the loaded row.
        let mut active = model.clone().into_active_model();
        for column in <E::Column as Iterable>::iter() {
            active.set(column, model.get(column));
        }

        match active.update(txn).await {
            Ok(stored) => Ok(Some(Box::new(move || {
                let _ = slot.set(stored);
            }))),
            Err(sea_orm::DbErr::RecordNotUpdated) => Err(RepositoryError::UpdateConflict {
                table: table_of::<E>(),
                key,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<E> Change for Delete<E>
where
    E: RepositoryEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync,
{
    fn describe(&self) -> String {
        format!("delete {} {}", table_of::<E>(), E::key_of(&self.model))
    }

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> RepositoryResult<Option<Publish>> {
        let Delete { model } = *self;
        let key = E::key_of(&model);
        let result = model.into_active_model().delete(txn).await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::UpdateConflict {
                table: table_of::<E>(),
                key,
            });
        }
        Ok(None)
    }
}

/// Ordered list of staged writes shared by the repositories of one unit of work.
///
/// Cloning yields another handle to the same list.
#[derive(Clone, Default)]
pub struct ChangeSet {
    changes: Arc<Mutex<Vec<Box<dyn Change>>>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Box<dyn Change>>> {
        self.changes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, change: Box<dyn Change>) {
        debug!(change = %change.describe(), "Staged change");
        self.lock().push(change);
    }

    pub(crate) fn stage_insert<E>(&self, model: E::Active) -> Pending<E::Model>
    where
        E: RepositoryEntity,
        E::Model: IntoActiveModel<E::Active> + Send + Sync,
    {
        let pending = Pending::new();
        self.push(Box::new(Insert::<E> {
            model,
            slot: pending.slot.clone(),
        }));
        pending
    }

    pub(crate) fn stage_update<E>(&self, model: E::Model) -> Pending<E::Model>
    where
        E: RepositoryEntity,
        E::Model: IntoActiveModel<E::Active> + Send + Sync,
    {
        let pending = Pending::new();
        self.push(Box::new(Update::<E> {
            model,
            slot: pending.slot.clone(),
        }));
        pending
    }

    pub(crate) fn stage_delete<E>(&self, model: E::Model)
    where
        E: RepositoryEntity,
        E::Model: IntoActiveModel<E::Active> + Send + Sync,
    {
        self.push(Box::new(Delete::<E> { model }));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Short descriptions of the staged changes, in order.
    pub fn describe(&self) -> Vec<String> {
        self.lock().iter().map(|change| change.describe()).collect()
    }

    /// Drops every staged change and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut changes = self.lock();
        let count = changes.len();
        changes.clear();
        count
    }

    /// Applies all staged changes in one transaction, in staging order.
    ///
    /// The list is drained whatever the outcome. On error the transaction is dropped
    /// unfinished, which rolls it back, so no partial write survives. [`Pending`]
    /// handles are only filled after the commit succeeds.
    pub async fn commit(&self, db: &DatabaseConnection) -> RepositoryResult<usize> {
        let changes = std::mem::take(&mut *self.lock());
        if changes.is_empty() {
            return Ok(0);
        }

        let count = changes.len();
        let txn = db.begin().await?;
        let mut published = Vec::with_capacity(count);
        for change in changes {
            published.extend(change.apply(&txn).await?);
        }
        txn.commit().await?;

        for publish in published {
            publish();
        }

        info!(changes = count, "Committed changes");
        Ok(count)
    }
}

impl fmt::Debug for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.describe()).finish()
    }
}
