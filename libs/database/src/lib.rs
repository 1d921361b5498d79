//! PostgreSQL access layer shared by the bookshop crates.
//!
//! - [`postgres`]: connection pool configuration, connect-with-retry, migrations, health
//! - [`repository`]: a generic repository over SeaORM entities whose writes are staged in a
//!   shared [`ChangeSet`] and committed atomically by the owning unit of work
//! - [`common`]: error type and retry helpers
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "bookshop_api").await?;
//! ```

pub mod common;
pub mod postgres;
pub mod repository;

pub use common::{DatabaseError, DatabaseResult};
pub use repository::{
    BaseRepository, ChangeSet, IncludePaths, Pending, QueryOptions, RepositoryEntity,
    RepositoryError, RepositoryResult,
};
