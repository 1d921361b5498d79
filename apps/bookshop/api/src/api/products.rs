use axum::Router;
use domain_catalog::{ProductService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::products::router(ProductService::new(state.db.clone()))
}
