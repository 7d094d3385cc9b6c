use crate::entities::size;
use crate::handlers::common::{map_service_error, success_response};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

/// Creates the router for size endpoints
pub fn sizes_routes() -> Router<AppState> {
    Router::new().route("/sizes", get(list_sizes))
}

/// List the size definitions of a shop
#[utoipa::path(
    get,
    path = "/api/{shopcode}/sizes",
    params(("shopcode" = String, Path, description = "Shop code")),
    responses(
        (status = 200, description = "Sizes ordered by index", body = [size::Model]),
        (status = 404, description = "Shop not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Sizes"
)]
pub async fn list_sizes(
    State(state): State<AppState>,
    Path(shopcode): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let sizes = state
        .services
        .sizes
        .list_sizes(&shopcode)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(sizes))
}
