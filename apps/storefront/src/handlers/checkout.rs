//! # Checkout Handler
//!
//! Checkout submission: assemble the priced order and hand it to the
//! payment session creator.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Submission                                  │
//! │                                                                         │
//! │  POST /checkout/{session}                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  In-flight guard ── already pending? → 409, nothing else runs          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Read cart (items + promo), fetch shipping option + tax config         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  assemble(...) ── empty cart / zero subtotal → 422, no session         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionCreator::create_session(...)                                   │
//! │       │                                                                 │
//! │       ├── Ok  → { url } → frontend redirects to hosted payment         │
//! │       │                                                                 │
//! │       └── Err → surfaced verbatim; cart stays intact for retry        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::carts::ensure_restored;
use crate::error::ApiError;
use crate::state::AppState;
use atelier_core::checkout::assemble;
use atelier_core::types::{CustomerDetails, TaxConfig};
use atelier_payments::SessionRequest;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer: CustomerDetails,
    pub shipping_option_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Hosted payment page to redirect the customer to.
    pub url: String,
}

/// Submits the checkout for a session.
///
/// The cart is NOT cleared here: the order is only paid once the
/// customer completes the hosted payment page, and fulfilment confirms
/// it out of band. A failed or abandoned session leaves the cart ready
/// for resubmission.
pub async fn submit_checkout(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    debug!(session_id = %session_id, "submit_checkout");

    // Duplicate-submission guard; released when _in_flight drops,
    // success and failure alike
    let _in_flight = state
        .checkout_guard
        .begin(&session_id)
        .ok_or_else(ApiError::checkout_in_flight)?;

    ensure_restored(&state.carts, &state.db, &session_id).await;

    let (items, promo) = state
        .carts
        .with_cart(&session_id, |cart| (cart.items.clone(), cart.promo.clone()));

    let shipping = state
        .db
        .rates()
        .shipping_by_id(&request.shipping_option_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Shipping option", &request.shipping_option_id))?;

    // Unknown regions tax at zero; the rates table is expected to carry
    // every region the shop sells into
    let tax_config = state
        .db
        .rates()
        .tax_for_region(&request.customer.region)
        .await?
        .unwrap_or_else(|| {
            debug!(region = %request.customer.region, "No tax configuration for region");
            TaxConfig::default()
        });

    let order = assemble(&items, &request.customer, &shipping, &tax_config, promo.as_ref())?;

    info!(
        session_id = %session_id,
        subtotal = order.subtotal_cents,
        discount = order.discount_cents,
        tax = order.tax_cents,
        shipping = order.shipping_cents,
        total = order.total_cents,
        "Order assembled"
    );

    let session = state
        .payments
        .create_session(&SessionRequest {
            order,
            customer: request.customer,
            client_reference: session_id.clone(),
        })
        .await?;

    info!(session_id = %session_id, payment_session = %session.id, "Checkout session created");

    Ok(Json(CheckoutResponse { url: session.url }))
}

// =============================================================================
// Unit Tests
// =============================================================================
