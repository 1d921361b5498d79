use database::{IncludePaths, QueryOptions, RepositoryError};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::entity::{category, product};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CreateProduct, Page, Product, SelectOption, UpdateProduct};
use crate::repository::CategoryRepository;
use crate::unit_of_work::UnitOfWork;

pub use crate::repository::DEFAULT_TOP_SELLING;

pub const PRODUCT_PAGE_SIZE: u64 = 8;

pub const ALL_CATEGORIES_TEXT: &str = "All Categories";

fn matches(product: &Product, term: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(term);
    contains(product.title.as_str())
        || product.description.as_deref().is_some_and(contains)
        || contains(product.author.as_str())
        || product.category.as_ref().is_some_and(|c| contains(c.name.as_str()))
}

/// Category a product write points at, if it exists and is not deleted.
async fn live_category(
    categories: &CategoryRepository,
    id: i32,
) -> CatalogResult<Option<Category>> {
    let condition = Condition::all()
        .add(category::Column::Id.eq(id))
        .add(category::Column::IsDeleted.eq(false));
    Ok(categories.get(condition, IncludePaths::none()).await?)
}

/// Product use cases. Each call runs in its own [`UnitOfWork`].
#[derive(Clone)]
pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn unit(&self) -> UnitOfWork {
        UnitOfWork::new(self.db.clone())
    }

    fn with_category() -> IncludePaths {
        IncludePaths::parse(product::CATEGORY)
    }

    /// Products by id with their category, filtered by category and search term, paged.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        category_filter: Option<i32>,
        search: Option<&str>,
    ) -> CatalogResult<Page<Product>> {
        let uow = self.unit();
        let mut products = uow
            .product()
            .get_all(
                QueryOptions::new()
                    .order_by_asc(product::Column::Id)
                    .include(Self::with_category()),
            )
            .await?;

        if let Some(term) = search.filter(|s| !s.is_empty()) {
            let term = term.to_lowercase();
            products.retain(|p| matches(p, &term));
        }
        if let Some(category_id) = category_filter {
            products.retain(|p| p.category_id == category_id);
        }

        Ok(Page::paginate(products, page, PRODUCT_PAGE_SIZE))
    }

    pub async fn get(&self, id: i32) -> CatalogResult<Product> {
        self.unit()
            .product()
            .get(product::Column::Id.eq(id), Self::with_category())
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Creates a product in an existing, non-deleted category with a title no
    /// other product uses.
    #[instrument(skip(self, input), fields(title = %input.title, category_id = input.category_id))]
    pub async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        input.validate()?;

        let uow = self.unit();
        let category = live_category(uow.category(), input.category_id)
            .await?
            .ok_or(CatalogError::UnknownCategory(input.category_id))?;

        let title = input.title.trim().to_string();
        if uow.product().title_exists(&title, None).await? {
            return Err(CatalogError::DuplicateProductTitle(title));
        }

        let pending = uow.product().add(input.into_active_model());
        uow.save().await?;

        let created = pending
            .saved()
            .ok_or_else(|| CatalogError::Internal("Inserted product was not returned".into()))?;
        info!(product_id = created.id, "Created product");

        Ok(Product {
            category: Some(Box::new(category)),
            ..Product::from(created)
        })
    }

    /// Replaces every column of the product with `input`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateProduct) -> CatalogResult<Product> {
        if input.id != id {
            return Err(CatalogError::ProductNotFound(id));
        }
        input.validate()?;

        let uow = self.unit();
        let category = live_category(uow.category(), input.category_id)
            .await?
            .ok_or(CatalogError::UnknownCategory(input.category_id))?;

        let title = input.title.trim().to_string();
        if uow.product().title_exists(&title, Some(id)).await? {
            return Err(CatalogError::DuplicateProductTitle(title));
        }

        let pending = uow.product().update(product::Model::from(input));
        if let Err(err) = uow.save().await {
            return Err(self.resolve_conflict(id, err).await);
        }

        let updated = pending
            .saved()
            .ok_or_else(|| CatalogError::Internal("Updated product was not returned".into()))?;
        info!(product_id = id, "Updated product");

        Ok(Product {
            category: Some(Box::new(category)),
            ..Product::from(updated)
        })
    }

    /// Removes the product. Unknown ids, including rows deleted concurrently, succeed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> CatalogResult<()> {
        let uow = self.unit();
        let Some(existing) = uow
            .product()
            .get(product::Column::Id.eq(id), IncludePaths::none())
            .await?
        else {
            info!(product_id = id, "Delete of unknown product ignored");
            return Ok(());
        };

        uow.product().remove(existing.into());
        match uow.save().await {
            Ok(_) => {
                info!(product_id = id, "Deleted product");
                Ok(())
            }
            Err(err) if err.is_update_conflict() => {
                debug!(product_id = id, "Product already gone");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn search(&self, term: &str) -> CatalogResult<Vec<Product>> {
        Ok(self.unit().product().search(term).await?)
    }

    pub async fn top_selling(&self, count: u64) -> CatalogResult<Vec<Product>> {
        Ok(self.unit().product().top_selling(count).await?)
    }

    pub async fn by_category(&self, category_id: i32) -> CatalogResult<Vec<Product>> {
        Ok(self.unit().product().by_category(category_id).await?)
    }

    /// Choices for the category filter: "All Categories" first, then active categories.
    pub async fn category_options(&self) -> CatalogResult<Vec<SelectOption>> {
        let categories = self.unit().category().active_categories().await?;

        let mut options = Vec::with_capacity(categories.len() + 1);
        options.push(SelectOption {
            value: String::new(),
            text: ALL_CATEGORIES_TEXT.to_string(),
        });
        options.extend(categories.into_iter().map(|c| SelectOption {
            value: c.id.to_string(),
            text: c.name,
        }));
        Ok(options)
    }

    async fn resolve_conflict(&self, id: i32, err: RepositoryError) -> CatalogError {
        if !err.is_update_conflict() {
            return err.into();
        }
        match self
            .unit()
            .product()
            .get(product::Column::Id.eq(id), IncludePaths::none())
            .await
        {
            Ok(None) => CatalogError::ProductNotFound(id),
            Ok(Some(_)) => {
                warn!(product_id = id, "Product changed underneath an update");
                err.into()
            }
            Err(lookup) => lookup.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, description: Option<&str>, category: &str) -> Product {
        Product {
            id: 1,
            title: title.to_string(),
            description: description.map(str::to_string),
            author: "Ann Leckie".to_string(),
            price: "11.00".parse().unwrap(),
            category_id: 1,
            category: Some(Box::new(Category {
                id: 1,
                name: category.to_string(),
                display_order: 0,
                is_active: true,
                is_deleted: false,
                created_at: chrono::Utc::now().fixed_offset(),
                products: None,
            })),
        }
    }

    #[test]
    fn test_matches_every_searchable_field() {
        let p = product("Ancillary Justice", Some("An AI seeks revenge"), "Space Opera");
        assert!(matches(&p, "justice"));
        assert!(matches(&p, "revenge"));
        assert!(matches(&p, "leckie"));
        assert!(matches(&p, "opera"));
        assert!(!matches(&p, "western"));
    }

    #[test]
    fn test_matches_without_description() {
        let p = product("Provenance", None, "Fiction");
        assert!(!matches(&p, "revenge"));
        assert!(matches(&p, "fict"));
    }
}
