//! # Cart Handlers
//!
//! HTTP surface of the cart store.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Hosted  │       │
//! │  │  Cart    │     │          │     │  Submit  │     │ Payment  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       submit_checkout                     │
//! │                   update_item       (checkout.rs)                       │
//! │                   remove_item                                           │
//! │                   apply_promo                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! │                                                                         │
//! │  Every mutation persists a fresh snapshot so the cart survives         │
//! │  page reloads.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::carts::{ensure_restored, persist_snapshot};
use crate::error::ApiError;
use crate::state::AppState;
use atelier_core::validation::validate_promo_code;
use atelier_core::{CartItem, CartTotals, Product};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPromoRequest {
    pub code: String,
}

/// Gets the current cart contents.
pub async fn get_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    debug!(session_id = %session_id, "get_cart");

    ensure_restored(&state.carts, &state.db, &session_id).await;

    let response = state.carts.with_cart(&session_id, |cart| CartResponse {
        items: cart.items.clone(),
        totals: CartTotals::from(&*cart),
    });

    Ok(Json(response))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases (capped at 99)
/// - If product not in cart: added as new item
/// - Price is "frozen" at time of adding (won't change if the catalog
///   updates)
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let quantity = request.quantity.unwrap_or(1);
    debug!(session_id = %session_id, product_id = %request.product_id, quantity = %quantity, "add_to_cart");

    ensure_restored(&state.carts, &state.db, &session_id).await;

    // Catalog cache first, database as cold-start fallback
    let product: Product = match state.catalog.get(&request.product_id) {
        Some(product) => product,
        None => state
            .db
            .products()
            .get_by_id(&request.product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", &request.product_id))?,
    };

    if !product.is_active {
        return Err(ApiError::validation("Product is not available for sale"));
    }

    let (response, snapshot) = state.carts.with_cart_mut(&session_id, |cart| {
        cart.add_item(&product, quantity);
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(&*cart),
        }
    });

    persist_snapshot(&state.db, &session_id, &snapshot).await;

    Ok(Json(response))
}

/// Updates the quantity of an item in the cart.
///
/// ## Behavior
/// - Quantity below 1 is ignored; the prior quantity is kept
/// - Quantity above 99 clamps to 99
/// - Unknown product IDs are a no-op
///
/// The mutation never fails; the response always reflects the cart's
/// (possibly unchanged) state.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path((session_id, product_id)): Path<(String, String)>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    debug!(session_id = %session_id, product_id = %product_id, quantity = %request.quantity, "update_cart_item");

    ensure_restored(&state.carts, &state.db, &session_id).await;

    let (response, snapshot) = state.carts.with_cart_mut(&session_id, |cart| {
        cart.update_quantity(&product_id, request.quantity);
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(&*cart),
        }
    });

    persist_snapshot(&state.db, &session_id, &snapshot).await;

    Ok(Json(response))
}

/// Removes an item from the cart. No-op if absent.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((session_id, product_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    debug!(session_id = %session_id, product_id = %product_id, "remove_from_cart");

    ensure_restored(&state.carts, &state.db, &session_id).await;

    let (response, snapshot) = state.carts.with_cart_mut(&session_id, |cart| {
        cart.remove_item(&product_id);
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(&*cart),
        }
    });

    persist_snapshot(&state.db, &session_id, &snapshot).await;

    Ok(Json(response))
}

/// Clears all items and the active promo code.
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    debug!(session_id = %session_id, "clear_cart");

    let (response, snapshot) = state.carts.with_cart_mut(&session_id, |cart| {
        cart.clear();
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(&*cart),
        }
    });

    persist_snapshot(&state.db, &session_id, &snapshot).await;

    Ok(Json(response))
}

/// Applies a promo code to the cart.
///
/// Looks the code up in the promo data source. Unknown, expired and
/// deactivated codes all produce the same user-facing not-found error;
/// the cart keeps its previous promo (if any). On success the new code
/// replaces any previously active one.
pub async fn apply_promo(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ApplyPromoRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    debug!(session_id = %session_id, code = %request.code, "apply_promo");

    ensure_restored(&state.carts, &state.db, &session_id).await;

    let normalized = validate_promo_code(&request.code)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let promo = state
        .db
        .promos()
        .get_by_code(&normalized)
        .await?
        .ok_or_else(|| ApiError::not_found("Promo code", &normalized))?;

    info!(session_id = %session_id, code = %promo.code, "Promo code applied");

    let (response, snapshot) = state.carts.with_cart_mut(&session_id, |cart| {
        cart.apply_promo(promo);
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(&*cart),
        }
    });

    persist_snapshot(&state.db, &session_id, &snapshot).await;

    Ok(Json(response))
}

/// Removes the active promo code.
pub async fn remove_promo(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    debug!(session_id = %session_id, "remove_promo");

    ensure_restored(&state.carts, &state.db, &session_id).await;

    let (response, snapshot) = state.carts.with_cart_mut(&session_id, |cart| {
        cart.remove_promo();
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(&*cart),
        }
    });

    persist_snapshot(&state.db, &session_id, &snapshot).await;

    Ok(Json(response))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogCache;
    use crate::config::StorefrontConfig;
    use atelier_core::types::{Discount, PromoCode};
    use atelier_db::{Database, DbConfig};
    use atelier_payments::MockSessionCreator;
    use chrono::Utc;
    use std::sync::Arc;

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = Arc::new(CatalogCache::new());
        let config = StorefrontConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            stripe_secret_key: None,
            checkout_success_url: "http://localhost/success".to_string(),
            checkout_cancel_url: "http://localhost/cancel".to_string(),
            catalog_refresh_secs: 30,
        };
        AppState::new(db, catalog, Arc::new(MockSessionCreator::new()), config)
    }

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            description: None,
            image_url: None,
            price_cents,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_add_update_remove_flow() {
        let state = test_state().await;
        state.catalog.replace_all(vec![test_product("p1", 2500)]);

        let response = add_to_cart(
            State(state.clone()),
            Path("s1".to_string()),
            Json(AddItemRequest {
                product_id: "p1".to_string(),
                quantity: Some(2),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.totals.subtotal_cents, 5000);

        // Quantity 0 is ignored
        let response = update_cart_item(
            State(state.clone()),
            Path(("s1".to_string(), "p1".to_string())),
            Json(UpdateQuantityRequest { quantity: 0 }),
        )
        .await
        .unwrap();
        assert_eq!(response.items[0].quantity, 2);

        // Quantity 100 clamps to 99
        let response = update_cart_item(
            State(state.clone()),
            Path(("s1".to_string(), "p1".to_string())),
            Json(UpdateQuantityRequest { quantity: 100 }),
        )
        .await
        .unwrap();
        assert_eq!(response.items[0].quantity, 99);

        let response = remove_from_cart(
            State(state.clone()),
            Path(("s1".to_string(), "p1".to_string())),
        )
        .await
        .unwrap();
        assert!(response.items.is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let state = test_state().await;

        let err = add_to_cart(
            State(state.clone()),
            Path("s1".to_string()),
            Json(AddItemRequest {
                product_id: "nope".to_string(),
                quantity: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_apply_unknown_promo_keeps_cart_intact() {
        let state = test_state().await;
        state.catalog.replace_all(vec![test_product("p1", 2500)]);

        add_to_cart(
            State(state.clone()),
            Path("s1".to_string()),
            Json(AddItemRequest {
                product_id: "p1".to_string(),
                quantity: Some(2),
            }),
        )
        .await
        .unwrap();

        let err = apply_promo(
            State(state.clone()),
            Path("s1".to_string()),
            Json(ApplyPromoRequest {
                code: "NOPE".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);

        // Cart unchanged, no promo applied
        let response = get_cart(State(state.clone()), Path("s1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.totals.subtotal_cents, 5000);
        assert_eq!(response.totals.discount_cents, 0);
    }

    #[tokio::test]
    async fn test_apply_promo_replaces_previous() {
        let state = test_state().await;
        state.catalog.replace_all(vec![test_product("p1", 2500)]);

        state
            .db
            .promos()
            .upsert(&PromoCode {
                code: "TEN".to_string(),
                discount: Discount::Percentage { bps: 1000 },
                expires_at: None,
            })
            .await
            .unwrap();
        state
            .db
            .promos()
            .upsert(&PromoCode {
                code: "FIVE".to_string(),
                discount: Discount::Fixed { amount_cents: 500 },
                expires_at: None,
            })
            .await
            .unwrap();

        add_to_cart(
            State(state.clone()),
            Path("s1".to_string()),
            Json(AddItemRequest {
                product_id: "p1".to_string(),
                quantity: Some(2),
            }),
        )
        .await
        .unwrap();

        let response = apply_promo(
            State(state.clone()),
            Path("s1".to_string()),
            Json(ApplyPromoRequest {
                code: "ten".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.totals.discount_cents, 500);
        assert_eq!(response.totals.discount_display.as_deref(), Some("10%"));

        // Applying another code replaces, never stacks
        let response = apply_promo(
            State(state.clone()),
            Path("s1".to_string()),
            Json(ApplyPromoRequest {
                code: "FIVE".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.totals.discount_cents, 500);
        assert_eq!(response.totals.discount_display.as_deref(), Some("$5.00"));
        assert_eq!(response.totals.total_cents, 4500);
    }

    #[tokio::test]
    async fn test_cart_restored_from_snapshot() {
        let state = test_state().await;
        state.catalog.replace_all(vec![test_product("p1", 2500)]);

        add_to_cart(
            State(state.clone()),
            Path("s1".to_string()),
            Json(AddItemRequest {
                product_id: "p1".to_string(),
                quantity: Some(2),
            }),
        )
        .await
        .unwrap();

        // Fresh registry simulates a process restart; the snapshot in
        // the database restores the cart on first access
        let restarted = AppState::new(
            state.db.clone(),
            state.catalog.clone(),
            state.payments.clone(),
            (*state.config).clone(),
        );

        let response = get_cart(State(restarted), Path("s1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.totals.subtotal_cents, 5000);
    }
}
