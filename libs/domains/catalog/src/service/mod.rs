mod category;
mod product;

pub use category::{CATEGORY_PAGE_SIZE, CategoryService};
pub use product::{ALL_CATEGORIES_TEXT, DEFAULT_TOP_SELLING, PRODUCT_PAGE_SIZE, ProductService};
