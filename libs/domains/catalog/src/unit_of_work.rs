use database::{ChangeSet, RepositoryResult};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::repository::{CategoryRepository, ProductRepository};

/// One business operation's worth of repositories sharing a single change set.
///
/// Writes staged through [`category`](Self::category) or [`product`](Self::product)
/// are held until [`save`](Self::save), which applies all of them in one transaction.
/// Dropping the unit without saving discards whatever is still staged.
pub struct UnitOfWork {
    db: DatabaseConnection,
    changes: ChangeSet,
    category: CategoryRepository,
    product: ProductRepository,
}

impl UnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        let changes = ChangeSet::new();
        Self {
            category: CategoryRepository::new(db.clone(), changes.clone()),
            product: ProductRepository::new(db.clone(), changes.clone()),
            db,
            changes,
        }
    }

    pub fn category(&self) -> &CategoryRepository {
        &self.category
    }

    pub fn product(&self) -> &ProductRepository {
        &self.product
    }

    /// Commits every staged change atomically and returns how many were applied.
    ///
    /// With nothing staged this returns 0 without touching the database.
    pub async fn save(&self) -> RepositoryResult<usize> {
        self.changes.commit(&self.db).await
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Forgets staged changes, returning how many were dropped.
    pub fn discard(&self) -> usize {
        self.changes.clear()
    }

    /// Ends the unit of work. Same as dropping it.
    pub fn dispose(self) {}
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.has_changes() {
            warn!(
                discarded = ?self.changes.describe(),
                "Unit of work dropped with unsaved changes"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{category, product};
    use sea_orm::{ActiveValue::Set, DatabaseBackend, MockDatabase, MockExecResult};

    fn product_model(id: i32, category_id: i32) -> product::Model {
        product::Model {
            id,
            title: "Kindred".to_string(),
            description: None,
            author: "Octavia E. Butler".to_string(),
            price: "14.00".parse().unwrap(),
            category_id,
        }
    }

    fn category_model(id: i32) -> category::Model {
        category::Model {
            id,
            name: "Speculative".to_string(),
            display_order: 1,
            is_deleted: false,
            is_active: true,
            created_at: chrono::Utc::now().fixed_offset(),
        }
    }

    #[tokio::test]
    async fn test_save_without_changes_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let uow = UnitOfWork::new(db.clone());

        assert!(!uow.has_changes());
        assert_eq!(uow.save().await.unwrap(), 0);
        uow.dispose();
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_changes_from_both_repositories_commit_together() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category_model(3)]])
            .append_query_results([vec![product_model(8, 3)]])
            .into_connection();
        let uow = UnitOfWork::new(db);

        let category = uow.category().add(category::ActiveModel {
            name: Set("Speculative".to_string()),
            display_order: Set(1),
            ..Default::default()
        });
        let product = uow.product().update(product_model(8, 3));
        assert!(uow.has_changes());
        assert!(!category.is_saved());

        assert_eq!(uow.save().await.unwrap(), 2);
        assert!(!uow.has_changes());
        assert_eq!(category.saved().unwrap().id, 3);
        assert_eq!(product.saved().unwrap().category_id, 3);
    }

    #[tokio::test]
    async fn test_failed_save_drains_changes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let uow = UnitOfWork::new(db);

        uow.product().remove(product_model(5, 1));
        let err = uow.save().await.unwrap_err();
        assert!(err.is_update_conflict());
        assert!(!uow.has_changes());
    }

    #[test]
    fn test_discard_drops_staged_changes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let uow = UnitOfWork::new(db);

        uow.product().remove(product_model(1, 1));
        uow.product().remove(product_model(2, 1));
        assert_eq!(uow.discard(), 2);
        assert!(!uow.has_changes());
    }
}
