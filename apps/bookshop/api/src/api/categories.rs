use axum::Router;
use domain_catalog::{CategoryService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::categories::router(CategoryService::new(state.db.clone()))
}
