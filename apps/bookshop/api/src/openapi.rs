use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Bookshop API",
        version = "0.1.0",
        description = "Catalog of book categories and products"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/categories", api = domain_catalog::handlers::categories::ApiDoc),
        (path = "/products", api = domain_catalog::handlers::products::ApiDoc)
    )
)]
pub struct ApiDoc;
