//! Throwaway entity and mock-backed tests for the generic repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Set};

use super::{
    BaseRepository, ChangeSet, IncludePaths, QueryOptions, RepositoryEntity, RepositoryError,
    RepositoryResult,
};

mod shelf {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "shelves")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub label: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[async_trait]
impl RepositoryEntity for shelf::Entity {
    type Active = shelf::ActiveModel;
    type Record = shelf::Model;

    fn key_of(model: &shelf::Model) -> String {
        model.id.to_string()
    }

    async fn load(
        _db: &DatabaseConnection,
        rows: Vec<shelf::Model>,
        include: &IncludePaths,
    ) -> RepositoryResult<Vec<shelf::Model>> {
        include.ensure_known(&[])?;
        Ok(rows)
    }
}

fn shelf(id: i32, label: &str) -> shelf::Model {
    shelf::Model {
        id,
        label: label.to_string(),
    }
}

fn repository(db: MockDatabase) -> BaseRepository<shelf::Entity> {
    BaseRepository::new(db.into_connection(), ChangeSet::new())
}

#[tokio::test]
async fn test_get_all_returns_rows() {
    let repo = repository(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![shelf(1, "Fiction"), shelf(2, "History")]]),
    );

    let rows = repo
        .get_all(QueryOptions::new().order_by_asc(shelf::Column::Label))
        .await
        .unwrap();

    assert_eq!(rows, vec![shelf(1, "Fiction"), shelf(2, "History")]);
}

#[tokio::test]
async fn test_get_returns_none_when_missing() {
    let repo = repository(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<shelf::Model>::new()]),
    );

    let row = repo.get(shelf::Column::Id.eq(42), IncludePaths::none()).await.unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn test_get_rejects_unknown_include() {
    let repo = repository(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![shelf(1, "Fiction")]]),
    );

    let err = repo.get(shelf::Column::Id.eq(1), "Books").await.unwrap_err();
    assert!(matches!(err, RepositoryError::UnknownInclude(name) if name == "Books"));
}

#[tokio::test]
async fn test_staging_does_not_write() {
    let repo = repository(MockDatabase::new(DatabaseBackend::Postgres));

    let pending = repo.add(shelf::ActiveModel {
        label: Set("Poetry".to_string()),
        ..Default::default()
    });
    repo.remove_range([shelf(3, "Drama"), shelf(4, "Essays")]);

    assert_eq!(repo.changes().len(), 3);
    assert!(!pending.is_saved());
    assert_eq!(
        repo.changes().describe(),
        vec!["insert into shelves", "delete shelves 3", "delete shelves 4"]
    );
}

#[tokio::test]
async fn test_commit_applies_changes_and_resolves_pending() {
    let repo = repository(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![shelf(7, "Poetry")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
    );

    let pending = repo.add(shelf::ActiveModel {
        label: Set("Poetry".to_string()),
        ..Default::default()
    });
    repo.remove(shelf(3, "Drama"));

    let applied = repo.changes().commit(repo.db()).await.unwrap();

    assert_eq!(applied, 2);
    assert_eq!(pending.saved(), Some(shelf(7, "Poetry")));
    assert!(repo.changes().is_empty());
}

#[tokio::test]
async fn test_update_of_missing_row_is_a_conflict() {
    let repo = repository(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<shelf::Model>::new()]),
    );

    let pending = repo.update(shelf(9, "Gone"));
    let err = repo.changes().commit(repo.db()).await.unwrap_err();

    match err {
        RepositoryError::UpdateConflict { table, key } => {
            assert_eq!(table, "shelves");
            assert_eq!(key, "9");
        }
        other => panic!("expected update conflict, got {other:?}"),
    }
    assert!(!pending.is_saved());
    assert!(repo.changes().is_empty());
}

#[tokio::test]
async fn test_delete_of_missing_row_is_a_conflict() {
    let repo = repository(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        },
    ]));

    repo.remove(shelf(5, "Gone"));
    let err = repo.changes().commit(repo.db()).await.unwrap_err();

    assert!(err.is_update_conflict());
}

#[tokio::test]
async fn test_rolled_back_insert_leaves_pending_empty() {
    let repo = repository(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![shelf(7, "Poetry")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }]),
    );

    let pending = repo.add(shelf::ActiveModel {
        label: Set("Poetry".to_string()),
        ..Default::default()
    });
    repo.remove(shelf(5, "Gone"));

    assert!(repo.changes().commit(repo.db()).await.is_err());
    assert!(!pending.is_saved());
}

#[tokio::test]
async fn test_commit_without_changes_is_a_no_op() {
    let repo = repository(MockDatabase::new(DatabaseBackend::Postgres));
    assert_eq!(repo.changes().commit(repo.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_clear_discards_staged_changes() {
    let changes = ChangeSet::new();
    let repo: BaseRepository<shelf::Entity> = BaseRepository::new(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        changes.clone(),
    );

    repo.update(shelf(1, "Fiction"));
    repo.remove(shelf(2, "History"));

    assert_eq!(changes.clear(), 2);
    assert!(repo.changes().is_empty());
}
