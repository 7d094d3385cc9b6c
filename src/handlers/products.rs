use crate::entities::{category, image, size};
use crate::handlers::common::{map_service_error, non_blank, require_param, success_response};
use crate::models::flags::TerminalType;
use crate::services::{ProductDetail, UpsertProductRequest};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product",
            get(get_product).post(upsert_product).delete(delete_product),
        )
        .route("/products", get(list_products))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductCodeQuery {
    /// Business code of the product
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListProductsQuery {
    /// Channel mask of the terminal, matched against the product's visibility bits
    #[serde(rename = "type")]
    pub terminal: Option<i32>,
    /// Restrict to one category of the shop
    pub category: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductImageResponse {
    pub index: i32,
    pub note: Option<String>,
    pub image: image::Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductSizeResponse {
    pub size: size::Model,
    pub index: i32,
    pub price_plus: i32,
    pub member_price_plus: i32,
    pub promote_price_plus: i32,
    pub stock: i32,
    pub promote_stock: i32,
    pub sold: i32,
    pub member_sold: i32,
    pub promote_sold: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub english_name: Option<String>,
    pub pinyin: Option<String>,
    pub price: i32,
    pub member_price: i32,
    pub promote_price: i32,
    pub stock: i32,
    pub promote_stock: i32,
    pub summary: Option<String>,
    pub note: Option<String>,
    pub web_allowed: bool,
    pub pos_allowed: bool,
    pub promote_allowed: bool,
    pub is_deleted: bool,
    pub category: category::Model,
    pub images: Vec<ProductImageResponse>,
    pub sizes: Vec<ProductSizeResponse>,
}

impl From<ProductDetail> for ProductResponse {
    fn from(detail: ProductDetail) -> Self {
        let ProductDetail {
            product,
            category,
            images,
            sizes,
        } = detail;
        let visibility = product.visibility();

        Self {
            id: product.id,
            code: product.code,
            name: product.name,
            english_name: product.english_name,
            pinyin: product.pinyin,
            price: product.price,
            member_price: product.member_price,
            promote_price: product.promote_price,
            stock: product.stock,
            promote_stock: product.promote_stock,
            summary: product.summary,
            note: product.note,
            web_allowed: visibility.web,
            pos_allowed: visibility.pos,
            promote_allowed: visibility.promote,
            is_deleted: product.is_deleted,
            category,
            images: images
                .into_iter()
                .map(|(link, image)| ProductImageResponse {
                    index: link.index,
                    note: link.note,
                    image,
                })
                .collect(),
            sizes: sizes
                .into_iter()
                .map(|(link, size)| ProductSizeResponse {
                    size,
                    index: link.index,
                    price_plus: link.price_plus,
                    member_price_plus: link.member_price_plus,
                    promote_price_plus: link.promote_price_plus,
                    stock: link.stock,
                    promote_stock: link.promote_stock,
                    sold: link.sold,
                    member_sold: link.member_sold,
                    promote_sold: link.promote_sold,
                })
                .collect(),
        }
    }
}

/// Get a product by code
#[utoipa::path(
    get,
    path = "/api/{shopcode}/product",
    params(
        ("shopcode" = String, Path, description = "Shop code"),
        ProductCodeQuery
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Missing product code", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shop or product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(shopcode): Path<String>,
    Query(query): Query<ProductCodeQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let code = require_param(non_blank(query.code), "product code")?;

    let detail = state
        .services
        .products
        .get_product(&shopcode, &code)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductResponse::from(detail)))
}

/// Create or update a product together with its images and sizes
#[utoipa::path(
    post,
    path = "/api/{shopcode}/product",
    params(("shopcode" = String, Path, description = "Shop code")),
    request_body = UpsertProductRequest,
    responses(
        (status = 200, description = "Product stored", body = ProductResponse),
        (status = 400, description = "Missing required field", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shop, category, image or size not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "No free product code", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn upsert_product(
    State(state): State<AppState>,
    Path(shopcode): Path<String>,
    Json(payload): Json<UpsertProductRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let detail = state
        .services
        .products
        .upsert_product(&shopcode, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductResponse::from(detail)))
}

/// Soft-delete a product
#[utoipa::path(
    delete,
    path = "/api/{shopcode}/product",
    params(
        ("shopcode" = String, Path, description = "Shop code"),
        ProductCodeQuery
    ),
    responses(
        (status = 200, description = "Product deleted", body = ProductResponse),
        (status = 400, description = "Missing product code", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shop or product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(shopcode): Path<String>,
    Query(query): Query<ProductCodeQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let code = require_param(non_blank(query.code), "product code")?;

    let detail = state
        .services
        .products
        .delete_product(&shopcode, &code)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductResponse::from(detail)))
}

/// List the products a terminal may show
#[utoipa::path(
    get,
    path = "/api/{shopcode}/products",
    params(
        ("shopcode" = String, Path, description = "Shop code"),
        ListProductsQuery
    ),
    responses(
        (status = 200, description = "Visible products", body = [ProductResponse]),
        (status = 400, description = "Missing terminal type", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shop or category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Path(shopcode): Path<String>,
    Query(query): Query<ListProductsQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let terminal = require_param(query.terminal, "terminal type")?;

    let products: Vec<ProductResponse> = state
        .services
        .products
        .list_products(&shopcode, TerminalType::from_bits(terminal), query.category)
        .await
        .map_err(map_service_error)?
        .into_iter()
        .map(ProductResponse::from)
        .collect();

    Ok(success_response(products))
}
