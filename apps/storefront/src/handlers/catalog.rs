//! # Catalog Handlers

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use atelier_core::Product;

/// Lists the active product catalog from the read-cache.
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    debug!("list_products");
    Json(state.catalog.list())
}

/// Gets a single product.
///
/// Falls back to the database when the cache has not seen the product
/// yet (cold start before the first refresh tick).
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    debug!(product_id = %product_id, "get_product");

    if let Some(product) = state.catalog.get(&product_id) {
        return Ok(Json(product));
    }

    let product = state
        .db
        .products()
        .get_by_id(&product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| ApiError::not_found("Product", &product_id))?;

    Ok(Json(product))
}
