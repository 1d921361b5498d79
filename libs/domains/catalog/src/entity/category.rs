use async_trait::async_trait;
use database::{IncludePaths, RepositoryEntity, RepositoryResult};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder};
use std::collections::HashMap;

use crate::models::Category;

pub const PRODUCTS: &str = "Products";

/// Partial unique index over `lower("CatName")` for rows that are not deleted.
pub const NAME_UNIQUE_INDEX: &str = "UX_Categories_CatName_Live";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(schema_name = "MasterSchema", table_name = "Categories")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "Id")]
    pub id: i32,
    #[sea_orm(column_name = "CatName")]
    pub name: String,
    #[sea_orm(column_name = "CatOrder")]
    pub display_order: i32,
    #[sea_orm(column_name = "IsDeleted")]
    pub is_deleted: bool,
    #[sea_orm(column_name = "IsActive")]
    pub is_active: bool,
    #[sea_orm(column_name = "CreatedDate")]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait]
impl RepositoryEntity for Entity {
    type Active = ActiveModel;
    type Record = Category;

    fn key_of(model: &Model) -> String {
        model.id.to_string()
    }

    async fn load(
        db: &DatabaseConnection,
        rows: Vec<Model>,
        include: &IncludePaths,
    ) -> RepositoryResult<Vec<Category>> {
        include.ensure_known(&[PRODUCTS])?;

        let Some(nested) = include.nested(PRODUCTS).filter(|_| !rows.is_empty()) else {
            return Ok(rows.into_iter().map(Category::from).collect());
        };

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let products = super::product::Entity::find()
            .filter(super::product::Column::CategoryId.is_in(ids))
            .order_by_asc(super::product::Column::Title)
            .all(db)
            .await?;
        let products = super::product::Entity::load(db, products, nested).await?;

        let mut by_category: HashMap<i32, Vec<_>> = HashMap::new();
        for product in products {
            by_category.entry(product.category_id).or_default().push(product);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let products = by_category.remove(&row.id).unwrap_or_default();
                Category {
                    products: Some(products),
                    ..Category::from(row)
                }
            })
            .collect())
    }
}
