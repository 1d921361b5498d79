use database::{BaseRepository, ChangeSet, QueryOptions, RepositoryResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Value};
use std::ops::Deref;
use tracing::debug;

use crate::entity::{category, product};
use crate::models::Category;

const NAME_EXISTS_SQL: &str = r#"
SELECT EXISTS (
    SELECT 1 FROM "MasterSchema"."Categories"
    WHERE NOT "IsDeleted"
      AND lower("CatName") = lower($1)
      AND ($2::int IS NULL OR "Id" <> $2)
) AS found"#;

/// Categories, with lookups that respect the soft-delete flag.
#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository<category::Entity>,
}

impl Deref for CategoryRepository {
    type Target = BaseRepository<category::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl CategoryRepository {
    pub fn new(db: DatabaseConnection, changes: ChangeSet) -> Self {
        Self {
            base: BaseRepository::new(db, changes),
        }
    }

    /// Active, non-deleted categories ordered by display order, then name.
    pub async fn active_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.get_all(
            QueryOptions::new()
                .filter(category::Column::IsDeleted.eq(false))
                .filter(category::Column::IsActive.eq(true))
                .order_by_asc(category::Column::DisplayOrder)
                .order_by_asc(category::Column::Name),
        )
        .await
    }

    /// Whether a non-deleted category other than `exclude_id` already uses `name`,
    /// compared case-insensitively.
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> RepositoryResult<bool> {
        debug!(name, ?exclude_id, "Checking category name");
        super::exists(
            self.db(),
            NAME_EXISTS_SQL,
            [Value::from(name.trim()), Value::from(exclude_id)],
        )
        .await
    }

    /// Number of products referencing the category, whatever its state.
    pub async fn products_count(&self, category_id: i32) -> RepositoryResult<u64> {
        let count = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .count(self.db())
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;

    fn found(value: bool) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("found", value.into())])
    }

    #[tokio::test]
    async fn test_name_exists_reads_flag() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![found(true)], vec![found(false)]])
            .into_connection();
        let repo = CategoryRepository::new(db, ChangeSet::new());

        assert!(repo.name_exists("Poetry", None).await.unwrap());
        assert!(!repo.name_exists("Poetry", Some(4)).await.unwrap());
    }

    #[tokio::test]
    async fn test_name_exists_binds_trimmed_name_and_excluded_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![found(false)]])
            .into_connection();
        let repo = CategoryRepository::new(db, ChangeSet::new());
        repo.name_exists("  Poetry ", Some(4)).await.unwrap();

        let log = repo.db().clone().into_transaction_log();
        let expected = sea_orm::Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            NAME_EXISTS_SQL,
            [Value::from("Poetry"), Value::from(Some(4))],
        );
        assert_eq!(log, vec![expected]);
    }
}
