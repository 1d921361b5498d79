use database::{
    BaseRepository, ChangeSet, IncludePaths, QueryOptions, RepositoryEntity, RepositoryResult,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, QueryOrder, QuerySelect, Statement,
    Value,
};
use std::ops::Deref;
use tracing::debug;

use crate::entity::product;
use crate::models::Product;

pub const DEFAULT_TOP_SELLING: u64 = 10;

// Postgres binds LIMIT as a signed bigint.
const MAX_LIMIT: u64 = i64::MAX as u64;

const TITLE_EXISTS_SQL: &str = r#"
SELECT EXISTS (
    SELECT 1 FROM "MasterSchema"."Products"
    WHERE lower("Title") = lower($1)
      AND ($2::int IS NULL OR "Id" <> $2)
) AS found"#;

// strpos keeps user input out of LIKE pattern syntax.
const SEARCH_SQL: &str = r#"
SELECT p."Id", p."Title", p."Description", p."Author", p."BookPrice", p."CategoryId"
FROM "MasterSchema"."Products" AS p
JOIN "MasterSchema"."Categories" AS c ON c."Id" = p."CategoryId"
WHERE strpos(lower(p."Title"), $1) > 0
   OR strpos(lower(coalesce(p."Description", '')), $1) > 0
   OR strpos(lower(p."Author"), $1) > 0
   OR strpos(lower(c."CatName"), $1) > 0
ORDER BY p."Title", p."Id""#;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository<product::Entity>,
}

impl Deref for ProductRepository {
    type Target = BaseRepository<product::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl ProductRepository {
    pub fn new(db: DatabaseConnection, changes: ChangeSet) -> Self {
        Self {
            base: BaseRepository::new(db, changes),
        }
    }

    fn with_category() -> IncludePaths {
        IncludePaths::parse(product::CATEGORY)
    }

    /// Products of one category with the category attached, ordered by title.
    pub async fn by_category(&self, category_id: i32) -> RepositoryResult<Vec<Product>> {
        self.get_all(
            QueryOptions::new()
                .filter(product::Column::CategoryId.eq(category_id))
                .order_by_asc(product::Column::Title)
                .include(Self::with_category()),
        )
        .await
    }

    /// Case-insensitive substring search over title, description, author and
    /// category name. A blank term returns every product.
    pub async fn search(&self, term: &str) -> RepositoryResult<Vec<Product>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self
                .get_all(
                    QueryOptions::new()
                        .order_by_asc(product::Column::Title)
                        .order_by_asc(product::Column::Id)
                        .include(Self::with_category()),
                )
                .await;
        }

        debug!(term = %term, "Searching products");
        let statement =
            Statement::from_sql_and_values(DbBackend::Postgres, SEARCH_SQL, [Value::from(term)]);
        let rows = product::Entity::find()
            .from_raw_sql(statement)
            .all(self.db())
            .await?;
        product::Entity::load(self.db(), rows, &Self::with_category()).await
    }

    /// The newest `count` products, category attached.
    ///
    /// There is no sales data yet, so recency stands in for popularity.
    pub async fn top_selling(&self, count: u64) -> RepositoryResult<Vec<Product>> {
        let rows = product::Entity::find()
            .order_by_desc(product::Column::Id)
            .limit(count.min(MAX_LIMIT))
            .all(self.db())
            .await?;
        product::Entity::load(self.db(), rows, &Self::with_category()).await
    }

    /// Whether a product other than `exclude_id` already has `title`, ignoring case.
    pub async fn title_exists(
        &self,
        title: &str,
        exclude_id: Option<i32>,
    ) -> RepositoryResult<bool> {
        debug!(title, ?exclude_id, "Checking product title");
        super::exists(
            self.db(),
            TITLE_EXISTS_SQL,
            [Value::from(title.trim()), Value::from(exclude_id)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::category;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn row(id: i32, title: &str, category_id: i32) -> product::Model {
        product::Model {
            id,
            title: title.to_string(),
            description: None,
            author: "Ursula K. Le Guin".to_string(),
            price: "9.99".parse().unwrap(),
            category_id,
        }
    }

    fn category_row(id: i32, name: &str) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
            display_order: 0,
            is_deleted: false,
            is_active: true,
            created_at: chrono::Utc::now().fixed_offset(),
        }
    }

    #[tokio::test]
    async fn test_search_attaches_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(2, "The Dispossessed", 1), row(1, "Lathe of Heaven", 1)]])
            .append_query_results([vec![category_row(1, "Fiction")]])
            .into_connection();
        let repo = ProductRepository::new(db, ChangeSet::new());

        let products = repo.search("HEAVEN").await.unwrap();
        assert_eq!(products.len(), 2);
        for product in &products {
            let category = product.category.as_ref().expect("category loaded");
            assert_eq!(category.name, "Fiction");
        }
    }

    #[tokio::test]
    async fn test_search_lowercases_term() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();
        let repo = ProductRepository::new(db, ChangeSet::new());
        assert!(repo.search("  Le GUIN ").await.unwrap().is_empty());

        let log = repo.db().clone().into_transaction_log();
        let expected = sea_orm::Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            SEARCH_SQL,
            [Value::from("le guin")],
        );
        assert_eq!(log[0], expected);
    }

    #[tokio::test]
    async fn test_top_selling_keeps_descending_id_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(9, "B", 2), row(7, "A", 1)]])
            .append_query_results([vec![category_row(1, "Poetry"), category_row(2, "Drama")]])
            .into_connection();
        let repo = ProductRepository::new(db, ChangeSet::new());

        let products = repo.top_selling(DEFAULT_TOP_SELLING).await.unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![9, 7]);
        assert_eq!(products[0].category.as_ref().unwrap().name, "Drama");
        assert_eq!(products[1].category.as_ref().unwrap().name, "Poetry");
    }

    #[tokio::test]
    async fn test_top_selling_clamps_limit_to_bigint() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();
        let repo = ProductRepository::new(db, ChangeSet::new());

        assert!(repo.top_selling(u64::MAX).await.unwrap().is_empty());

        let log = repo.db().clone().into_transaction_log();
        let values = log[0].statements()[0]
            .values
            .clone()
            .expect("limit is bound");
        assert!(values.0.contains(&Value::BigUnsigned(Some(MAX_LIMIT))));
        assert!(!values.0.contains(&Value::BigUnsigned(Some(u64::MAX))));
    }
}
