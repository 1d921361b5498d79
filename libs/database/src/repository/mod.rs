//! Generic repository over SeaORM entities.
//!
//! Reads go straight to the connection. Writes (`add`, `update`, `remove`) are only
//! staged in a [`ChangeSet`] shared by every repository of one unit of work, and reach
//! storage together, inside a single transaction, when the change set is committed.

mod base;
mod change_set;
mod error;
mod include;
mod query;

#[cfg(test)]
mod fixtures;

pub use base::BaseRepository;
pub use change_set::{ChangeSet, Pending};
pub use error::{RepositoryError, RepositoryResult};
pub use include::{IncludePaths, RepositoryEntity};
pub use query::QueryOptions;
