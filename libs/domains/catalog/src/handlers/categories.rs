use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
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
    Category, CategoryListParams, CreateCategory, Page, ProductCountResponse, SuccessResponse,
    ToggleStatusResponse, UpdateCategory,
};
use crate::service::CategoryService;

pub const TAG: &str = "categories";

/// OpenAPI documentation for the Categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        active_categories,
        get_category,
        update_category,
        delete_category,
        toggle_status,
        product_count,
    ),
    components(
        schemas(
            Category,
            CreateCategory,
            UpdateCategory,
            SuccessResponse,
            ToggleStatusResponse,
            ProductCountResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Book category management")
    )
)]
pub struct ApiDoc;

/// Category routes, to be nested under `/categories`.
pub fn router(service: CategoryService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/active", get(active_categories))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/{id}/toggle-status", post(toggle_status))
        .route("/{id}/product-count", get(product_count))
        .with_state(shared_service)
}

/// List non-deleted categories, ten per page
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(CategoryListParams),
    responses(
        (status = 200, description = "Page of categories", body = Page<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(params): Query<CategoryListParams>,
) -> CatalogResult<Json<Page<Category>>> {
    let page = service
        .list(params.page.unwrap_or(1), params.search.as_deref())
        .await?;
    Ok(Json(page))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category(
    State(service): State<Arc<CategoryService>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Active categories in display order
#[utoipa::path(
    get,
    path = "/active",
    tag = TAG,
    responses(
        (status = 200, description = "Active categories", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn active_categories(
    State(service): State<Arc<CategoryService>>,
) -> CatalogResult<Json<Vec<Category>>> {
    Ok(Json(service.active().await?))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category(
    State(service): State<Arc<CategoryService>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Category>> {
    Ok(Json(service.get(id).await?))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category(
    State(service): State<Arc<CategoryService>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    Ok(Json(service.update(id, input).await?))
}

/// Soft-delete a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted (or never existed)", body = SuccessResponse),
        (status = 400, response = BadRequestPathResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<SuccessResponse>> {
    service.delete(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Flip the active flag of a category
#[utoipa::path(
    post,
    path = "/{id}/toggle-status",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "New status", body = ToggleStatusResponse),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn toggle_status(
    State(service): State<Arc<CategoryService>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<ToggleStatusResponse>> {
    let is_active = service.toggle_status(id).await?;
    Ok(Json(ToggleStatusResponse {
        success: true,
        is_active,
    }))
}

/// Number of products in a category
#[utoipa::path(
    get,
    path = "/{id}/product-count",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Product count", body = ProductCountResponse),
        (status = 400, response = BadRequestPathResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn product_count(
    State(service): State<Arc<CategoryService>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<ProductCountResponse>> {
    let count = service.product_count(id).await?;
    Ok(Json(ProductCountResponse {
        category_id: id,
        count,
    }))
}
