//! Book catalog domain: categories and the products filed under them.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────────────────┐
//! │   handlers   │──▶│   service    │──▶│         UnitOfWork          │
//! │ (axum, JSON) │   │ (use cases)  │   │ category() ─┐  ┌─ product() │
//! └──────────────┘   └──────────────┘   │             ▼  ▼            │
//!                                       │     shared ChangeSet        │
//!                                       └──────────────┬──────────────┘
//!                                                      │ save(): one transaction
//!                                                      ▼
//!                                       MasterSchema.Categories / Products
//! ```
//!
//! Every service call opens its own [`UnitOfWork`]. Reads hit the database directly;
//! writes are staged and land together on [`UnitOfWork::save`].
//!
//! ```ignore
//! use domain_catalog::{CategoryService, ProductService, handlers};
//!
//! let api = axum::Router::new()
//!     .nest("/categories", handlers::categories::router(CategoryService::new(db.clone())))
//!     .nest("/products", handlers::products::router(ProductService::new(db)));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod unit_of_work;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    Category, CreateCategory, CreateProduct, Page, Product, SelectOption, UpdateCategory,
    UpdateProduct,
};
pub use repository::{CategoryRepository, ProductRepository};
pub use service::{CategoryService, ProductService};
pub use unit_of_work::UnitOfWork;
