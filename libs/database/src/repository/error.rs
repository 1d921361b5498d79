use sea_orm::{DbErr, SqlErr};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A staged update or delete matched no row: it was removed or changed underneath us.
    #[error("No row in {table} with key {key} was affected")]
    UpdateConflict { table: String, key: String },

    #[error("Unknown include path '{0}'")]
    UnknownInclude(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    pub fn is_update_conflict(&self) -> bool {
        matches!(self, Self::UpdateConflict { .. })
    }
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::UniqueViolation(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                Self::ForeignKeyViolation(detail)
            }
            _ => Self::Database(err),
        }
    }
}
