use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::RepositoryError;
use serde_json::json;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::entity::category;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category {0} not found")]
    CategoryNotFound(i32),

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("A category named '{0}' already exists")]
    DuplicateCategoryName(String),

    #[error("A product titled '{0}' already exists")]
    DuplicateProductTitle(String),

    /// Product write pointing at a category that is missing or soft-deleted.
    #[error("Category {0} does not exist")]
    UnknownCategory(i32),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CategoryNotFound(_) | Self::ProductNotFound(_))
    }

    /// Maps a failed category save. A write that lost a race on the live-name index
    /// becomes the same name conflict the pre-check reports.
    pub fn from_category_write(err: RepositoryError, name: &str) -> Self {
        match err {
            RepositoryError::UniqueViolation(ref detail)
                if detail.contains(category::NAME_UNIQUE_INDEX) =>
            {
                Self::DuplicateCategoryName(name.to_string())
            }
            other => other.into(),
        }
    }
}

fn field_error(field: &'static str, code: &'static str, message: String, value: &str) -> ValidationErrors {
    let mut error = ValidationError::new(code).with_message(Cow::Owned(message));
    error.add_param(Cow::Borrowed("value"), &json!(value));

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(_) | CatalogError::ProductNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CatalogError::Validation(errors) => AppError::ValidationError(errors),
            CatalogError::DuplicateCategoryName(ref name) => AppError::FieldConflict {
                errors: field_error("name", "unique", err.to_string(), name),
                message: err.to_string(),
            },
            CatalogError::DuplicateProductTitle(ref title) => AppError::FieldConflict {
                errors: field_error("title", "unique", err.to_string(), title),
                message: err.to_string(),
            },
            CatalogError::UnknownCategory(id) => AppError::ValidationError(field_error(
                "category_id",
                "unknown_category",
                err.to_string(),
                &id.to_string(),
            )),
            CatalogError::Repository(RepositoryError::Database(db_err)) => {
                AppError::Database(db_err)
            }
            CatalogError::Repository(RepositoryError::UniqueViolation(detail)) => {
                AppError::Conflict(format!("Duplicate value: {}", detail))
            }
            CatalogError::Repository(RepositoryError::ForeignKeyViolation(detail)) => {
                AppError::Conflict(format!("Record is still referenced: {}", detail))
            }
            CatalogError::Repository(err @ RepositoryError::UpdateConflict { .. }) => {
                AppError::InternalServerError(err.to_string())
            }
            CatalogError::Repository(err @ RepositoryError::UnknownInclude(_)) => {
                AppError::InternalServerError(err.to_string())
            }
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
