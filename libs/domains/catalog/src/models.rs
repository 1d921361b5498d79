use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::entity::{category, product};

const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
const MAX_PRICE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Checks the value as it will be stored: trimmed, non-empty and at most `max` characters.
fn validate_trimmed(value: &str, max: usize, message: &'static str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("Must not be blank")));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::new("length").with_message(Cow::Borrowed(message)));
    }
    Ok(())
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    validate_trimmed(value, 50, "Name must be between 1 and 50 characters")
}

fn validate_title(value: &str) -> Result<(), ValidationError> {
    validate_trimmed(value, 50, "Title must be between 1 and 50 characters")
}

fn validate_author(value: &str) -> Result<(), ValidationError> {
    validate_trimmed(value, 50, "Author must be between 1 and 50 characters")
}

/// Blank descriptions are stored as NULL, so only the trimmed length is limited.
fn validate_description(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() > 250 {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Description must be at most 250 characters")));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < MIN_PRICE || *price > MAX_PRICE {
        return Err(ValidationError::new("range")
            .with_message(Cow::Borrowed("Price must be between 0.01 and 10000")));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("precision")
            .with_message(Cow::Borrowed("Price must have at most two decimal places")));
    }
    Ok(())
}

/// Treats a missing or empty query value as `None`, so `?category_filter=` means "all".
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Trims `value`, turning whitespace-only text into `None`.
pub(crate) fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Book category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    /// Display name, unique among categories that are not deleted
    pub name: String,
    /// Position in ordered listings (ascending)
    pub display_order: i32,
    pub is_active: bool,
    /// Soft-delete flag; deleted categories are hidden from listings
    pub is_deleted: bool,
    pub created_at: DateTime<FixedOffset>,
    /// Products in this category, present only when loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub products: Option<Vec<Product>>,
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            display_order: model.display_order,
            is_active: model.is_active,
            is_deleted: model.is_deleted,
            created_at: model.created_at,
            products: None,
        }
    }
}

impl From<Category> for category::Model {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            display_order: category.display_order,
            is_deleted: category.is_deleted,
            is_active: category.is_active,
            created_at: category.created_at,
        }
    }
}

/// Book for sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    /// Price with two decimal places
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    pub category_id: i32,
    /// Owning category, present only when loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub category: Option<Box<Category>>,
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            author: model.author,
            price: model.price,
            category_id: model.category_id,
            category: None,
        }
    }
}

impl From<Product> for product::Model {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            author: product.author,
            price: product.price,
            category_id: product.category_id,
        }
    }
}

/// Input for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Display order must not be negative"))]
    pub display_order: i32,
}

impl CreateCategory {
    pub(crate) fn into_active_model(self) -> category::ActiveModel {
        use sea_orm::ActiveValue::Set;

        category::ActiveModel {
            name: Set(self.name.trim().to_string()),
            display_order: Set(self.display_order),
            is_deleted: Set(false),
            is_active: Set(true),
            ..Default::default()
        }
    }
}

/// Input for updating a category; `id` must match the id in the path
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    pub id: i32,
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Display order must not be negative"))]
    pub display_order: i32,
    /// Leaves the current flag untouched when omitted
    pub is_active: Option<bool>,
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(custom(function = "validate_description"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_author"))]
    pub author: String,
    #[schema(value_type = String, example = "12.50")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "A category must be selected"))]
    pub category_id: i32,
}

impl CreateProduct {
    pub(crate) fn into_active_model(self) -> product::ActiveModel {
        use sea_orm::ActiveValue::Set;

        product::ActiveModel {
            title: Set(self.title.trim().to_string()),
            description: Set(trimmed_or_none(self.description)),
            author: Set(self.author.trim().to_string()),
            price: Set(self.price),
            category_id: Set(self.category_id),
            ..Default::default()
        }
    }
}

/// Input for updating a product; every column is overwritten
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    pub id: i32,
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(custom(function = "validate_description"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_author"))]
    pub author: String,
    #[schema(value_type = String, example = "12.50")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "A category must be selected"))]
    pub category_id: i32,
}

impl From<UpdateProduct> for product::Model {
    fn from(input: UpdateProduct) -> Self {
        Self {
            id: input.id,
            title: input.title.trim().to_string(),
            description: trimmed_or_none(input.description),
            author: input.author.trim().to_string(),
            price: input.price,
            category_id: input.category_id,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Cuts page `page` (clamped to at least 1) out of the full listing `items`.
    ///
    /// A page past the end yields no items but still reports the real totals.
    pub fn paginate(items: Vec<T>, page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_items = items.len() as u64;
        let total_pages = total_items.div_ceil(page_size);

        let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(skip).take(take).collect();

        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
        }
    }
}

/// Entry of the category filter drop-down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

/// Acknowledgement returned by delete endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToggleStatusResponse {
    pub success: bool,
    /// Active flag after the toggle
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductCountResponse {
    pub category_id: i32,
    pub count: u64,
}

/// Query parameters for the category listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryListParams {
    /// 1-based page number (default 1)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u64>,
    /// Case-insensitive substring of the category name
    pub search: Option<String>,
}

/// Query parameters for the product listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// 1-based page number (default 1)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u64>,
    /// Only products of this category; empty means all categories
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_filter: Option<i32>,
    /// Case-insensitive substring of title, description, author or category name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Search term; blank returns every product
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopSellingParams {
    /// Number of products to return (default 10)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub count: Option<u64>,
}
