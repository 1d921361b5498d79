use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath, ValidatedJson,
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    CreateProduct, Page, Product, ProductListParams, SearchParams, SelectOption, SuccessResponse,
    TopSellingParams, UpdateProduct,
};
use crate::service::{DEFAULT_TOP_SELLING, ProductService};

pub const TAG: &str = "products";

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        search_products,
        top_selling,
        category_options,
        products_by_category,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, SelectOption, SuccessResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Book catalog")
    )
)]
pub struct ApiDoc;

/// Product routes, to be nested under `/products`.
pub fn router(service: ProductService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/top-selling", get(top_selling))
        .route("/category-options", get(category_options))
        .route("/by-category/{category_id}", get(products_by_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products with their category, eight per page
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductListParams),
    responses(
        (status = 200, description = "Page of products", body = Page<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(params): Query<ProductListParams>,
) -> CatalogResult<Json<Page<Product>>> {
    let page = service
        .list(
            params.page.unwrap_or(1),
            params.category_filter,
            params.search.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product(
    State(service): State<Arc<ProductService>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Search products by title, description, author or category name
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(SearchParams),
    responses(
        (status = 200, description = "Matching products ordered by title", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products(
    State(service): State<Arc<ProductService>>,
    Query(params): Query<SearchParams>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.search(params.q.as_deref().unwrap_or_default()).await?;
    Ok(Json(products))
}

/// Newest products
#[utoipa::path(
    get,
    path = "/top-selling",
    tag = TAG,
    params(TopSellingParams),
    responses(
        (status = 200, description = "Products by descending id", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn top_selling(
    State(service): State<Arc<ProductService>>,
    Query(params): Query<TopSellingParams>,
) -> CatalogResult<Json<Vec<Product>>> {
    let count = params.count.unwrap_or(DEFAULT_TOP_SELLING);
    Ok(Json(service.top_selling(count).await?))
}

/// Options for the category filter drop-down
#[utoipa::path(
    get,
    path = "/category-options",
    tag = TAG,
    responses(
        (status = 200, description = "\"All Categories\" followed by active categories", body = Vec<SelectOption>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_options(
    State(service): State<Arc<ProductService>>,
) -> CatalogResult<Json<Vec<SelectOption>>> {
    Ok(Json(service.category_options().await?))
}

/// Products of one category, ordered by title
#[utoipa::path(
    get,
    path = "/by-category/{category_id}",
    tag = TAG,
    params(
        ("category_id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products in the category", body = Vec<Product>),
        (status = 400, response = BadRequestPathResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn products_by_category(
    State(service): State<Arc<ProductService>>,
    IdPath(category_id): IdPath,
) -> CatalogResult<Json<Vec<Product>>> {
    Ok(Json(service.by_category(category_id).await?))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product(
    State(service): State<Arc<ProductService>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.get(id).await?))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product(
    State(service): State<Arc<ProductService>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.update(id, input).await?))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted (or never existed)", body = SuccessResponse),
        (status = 400, response = BadRequestPathResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product(
    State(service): State<Arc<ProductService>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<SuccessResponse>> {
    service.delete(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
