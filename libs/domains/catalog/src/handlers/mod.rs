//! HTTP handlers, one router and OpenAPI document per resource.

pub mod categories;
pub mod products;
