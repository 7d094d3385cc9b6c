use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shoppoint API",
        version = "0.1.0",
        description = r#"
# Shoppoint API

Catalog backend for point-of-sale and web shops. Every catalog route is
scoped to a shop through its code, e.g. `/api/bakery/products?type=2`.

Product visibility is a channel mask: bit 0 web, bit 1 POS, bit 2 promotion.
"#
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Sizes", description = "Size definitions"),
        (name = "Health", description = "Liveness and readiness")
    ),
    paths(
        crate::handlers::products::get_product,
        crate::handlers::products::upsert_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::list_products,
        crate::handlers::sizes::list_sizes,
        crate::health::simple_health_check,
        crate::health::readiness_check,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::services::products::UpsertProductRequest,
            crate::services::products::ImageRef,
            crate::services::products::SizePrice,
            crate::handlers::products::ProductResponse,
            crate::handlers::products::ProductImageResponse,
            crate::handlers::products::ProductSizeResponse,
            crate::entities::category::Model,
            crate::entities::image::Model,
            crate::entities::size::Model,
        )
    )
)]
pub struct ApiDoc;

/// Serves the generated document at `/api-docs/openapi.json`
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
