use async_trait::async_trait;
use database::{IncludePaths, RepositoryEntity, RepositoryResult};
use sea_orm::QueryFilter;
use sea_orm::entity::prelude::*;
use std::collections::HashMap;

use crate::models::Product;

pub const CATEGORY: &str = "Category";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(schema_name = "MasterSchema", table_name = "Products")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "Id")]
    pub id: i32,
    #[sea_orm(column_name = "Title")]
    pub title: String,
    #[sea_orm(column_name = "Description", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "Author")]
    pub author: String,
    #[sea_orm(column_name = "BookPrice", column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_name = "CategoryId")]
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait]
impl RepositoryEntity for Entity {
    type Active = ActiveModel;
    type Record = Product;

    fn key_of(model: &Model) -> String {
        model.id.to_string()
    }

    async fn load(
        db: &DatabaseConnection,
        rows: Vec<Model>,
        include: &IncludePaths,
    ) -> RepositoryResult<Vec<Product>> {
        include.ensure_known(&[CATEGORY])?;

        let Some(nested) = include.nested(CATEGORY).filter(|_| !rows.is_empty()) else {
            return Ok(rows.into_iter().map(Product::from).collect());
        };

        let mut ids: Vec<i32> = rows.iter().map(|row| row.category_id).collect();
        ids.sort_unstable();
        ids.dedup();

        // Soft-deleted categories still load: a product keeps pointing at its row.
        let categories = super::category::Entity::find()
            .filter(super::category::Column::Id.is_in(ids))
            .all(db)
            .await?;
        let categories: HashMap<i32, _> = super::category::Entity::load(db, categories, nested)
            .await?
            .into_iter()
            .map(|category| (category.id, category))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let category = categories.get(&row.category_id).cloned().map(Box::new);
                Product {
                    category,
                    ..Product::from(row)
                }
            })
            .collect())
    }
}
