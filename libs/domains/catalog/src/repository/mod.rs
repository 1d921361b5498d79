//! Entity repositories: generic CRUD from [`BaseRepository`] plus catalog-specific queries.
//!
//! [`BaseRepository`]: database::BaseRepository

mod category;
mod product;

pub use category::CategoryRepository;
pub use product::{DEFAULT_TOP_SELLING, ProductRepository};

use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement, Value};

use database::RepositoryResult;

#[derive(Debug, FromQueryResult)]
struct Exists {
    found: bool,
}

/// Runs a `SELECT EXISTS(...) AS found` statement.
async fn exists(
    db: &DatabaseConnection,
    sql: &str,
    values: impl IntoIterator<Item = Value>,
) -> RepositoryResult<bool> {
    let statement = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);
    let row = Exists::find_by_statement(statement).one(db).await?;
    Ok(row.is_some_and(|row| row.found))
}
