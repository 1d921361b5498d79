//! SeaORM entities for the `MasterSchema` tables.

pub mod category;
pub mod product;
