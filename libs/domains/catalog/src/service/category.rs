use database::{IncludePaths, QueryOptions, RepositoryError};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::entity::category;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CreateCategory, Page, UpdateCategory};
use crate::unit_of_work::UnitOfWork;

pub const CATEGORY_PAGE_SIZE: u64 = 10;

fn live(id: i32) -> Condition {
    Condition::all()
        .add(category::Column::Id.eq(id))
        .add(category::Column::IsDeleted.eq(false))
}

/// Category use cases. Each call runs in its own [`UnitOfWork`].
#[derive(Clone)]
pub struct CategoryService {
    db: DatabaseConnection,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn unit(&self) -> UnitOfWork {
        UnitOfWork::new(self.db.clone())
    }

    /// Non-deleted categories by display order then name, optionally narrowed to names
    /// containing `search` (case-insensitive), one page at a time.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, search: Option<&str>) -> CatalogResult<Page<Category>> {
        let uow = self.unit();
        let mut categories = uow
            .category()
            .get_all(
                QueryOptions::new()
                    .filter(category::Column::IsDeleted.eq(false))
                    .order_by_asc(category::Column::DisplayOrder)
                    .order_by_asc(category::Column::Name),
            )
            .await?;

        if let Some(term) = search.filter(|s| !s.is_empty()) {
            let term = term.to_lowercase();
            categories.retain(|c| c.name.to_lowercase().contains(&term));
        }

        Ok(Page::paginate(categories, page, CATEGORY_PAGE_SIZE))
    }

    /// Active, non-deleted categories in display order.
    pub async fn active(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.unit().category().active_categories().await?)
    }

    pub async fn get(&self, id: i32) -> CatalogResult<Category> {
        self.unit()
            .category()
            .get(live(id), IncludePaths::none())
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Creates an active category. Names must be unique among non-deleted categories.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        input.validate()?;

        let uow = self.unit();
        let name = input.name.trim().to_string();
        if uow.category().name_exists(&name, None).await? {
            return Err(CatalogError::DuplicateCategoryName(name));
        }

        let pending = uow.category().add(input.into_active_model());
        uow.save()
            .await
            .map_err(|e| CatalogError::from_category_write(e, &name))?;

        let created = pending
            .saved()
            .ok_or_else(|| CatalogError::Internal("Inserted category was not returned".into()))?;
        info!(category_id = created.id, "Created category");
        Ok(created.into())
    }

    /// Overwrites name, display order and (when given) the active flag.
    ///
    /// A body `id` that differs from `id`, or a category that is missing or deleted,
    /// is reported as not found.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateCategory) -> CatalogResult<Category> {
        if input.id != id {
            return Err(CatalogError::CategoryNotFound(id));
        }
        input.validate()?;

        let uow = self.unit();
        let existing = uow
            .category()
            .get(live(id), IncludePaths::none())
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let name = input.name.trim().to_string();
        if uow.category().name_exists(&name, Some(id)).await? {
            return Err(CatalogError::DuplicateCategoryName(name));
        }

        let mut model = category::Model::from(existing);
        model.name = name.clone();
        model.display_order = input.display_order;
        if let Some(is_active) = input.is_active {
            model.is_active = is_active;
        }

        let pending = uow.category().update(model);
        if let Err(err) = uow.save().await {
            if err.is_update_conflict() {
                return Err(self.resolve_conflict(id, err).await);
            }
            return Err(CatalogError::from_category_write(err, &name));
        }

        let updated = pending
            .saved()
            .ok_or_else(|| CatalogError::Internal("Updated category was not returned".into()))?;
        info!(category_id = id, "Updated category");
        Ok(updated.into())
    }

    /// Soft-deletes the category. Unknown ids succeed silently.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> CatalogResult<()> {
        let uow = self.unit();
        let Some(existing) = uow
            .category()
            .get(category::Column::Id.eq(id), IncludePaths::none())
            .await?
        else {
            info!(category_id = id, "Delete of unknown category ignored");
            return Ok(());
        };

        let mut model = category::Model::from(existing);
        model.is_deleted = true;
        uow.category().update(model);
        uow.save().await?;

        info!(category_id = id, "Soft-deleted category");
        Ok(())
    }

    /// Flips the active flag and returns its new value.
    #[instrument(skip(self))]
    pub async fn toggle_status(&self, id: i32) -> CatalogResult<bool> {
        let uow = self.unit();
        let existing = uow
            .category()
            .get(live(id), IncludePaths::none())
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let mut model = category::Model::from(existing);
        model.is_active = !model.is_active;
        let is_active = model.is_active;

        uow.category().update(model);
        if let Err(err) = uow.save().await {
            return Err(self.resolve_conflict(id, err).await);
        }

        info!(category_id = id, is_active, "Toggled category status");
        Ok(is_active)
    }

    pub async fn product_count(&self, id: i32) -> CatalogResult<u64> {
        Ok(self.unit().category().products_count(id).await?)
    }

    /// A write that matched no row means the category vanished or was changed
    /// concurrently: not found if it is gone, otherwise the conflict stands.
    async fn resolve_conflict(&self, id: i32, err: RepositoryError) -> CatalogError {
        if !err.is_update_conflict() {
            return err.into();
        }
        match self.unit().category().get(live(id), IncludePaths::none()).await {
            Ok(None) => CatalogError::CategoryNotFound(id),
            Ok(Some(_)) => {
                warn!(category_id = id, "Category changed underneath an update");
                err.into()
            }
            Err(lookup) => lookup.into(),
        }
    }
}
