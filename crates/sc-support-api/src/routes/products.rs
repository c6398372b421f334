//! Storefront catalogue endpoints.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use sc_protocol::Product;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/products: list the catalogue.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.store.list_products().await?))
}

/// GET /api/products/:id: get one product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    state
        .store
        .get_product(product_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("product '{product_id}' not found")))
}
