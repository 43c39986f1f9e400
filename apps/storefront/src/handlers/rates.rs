//! # Rates Handlers
//!
//! Read-only lookups the checkout page needs: shipping options for the
//! destination country and the tax configuration for the customer's
//! region.

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use atelier_core::types::{ShippingOption, TaxConfig};

/// Lists shipping options for a destination country, cheapest first.
pub async fn shipping_options(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<Vec<ShippingOption>>, ApiError> {
    debug!(country = %country, "shipping_options");

    let options = state.db.rates().shipping_for_country(&country).await?;
    Ok(Json(options))
}

/// Gets the tax configuration for a customer region.
///
/// Unknown regions return all-zero rates, matching checkout behavior.
pub async fn tax_config(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<TaxConfig>, ApiError> {
    debug!(region = %region, "tax_config");

    let config = state
        .db
        .rates()
        .tax_for_region(&region)
        .await?
        .unwrap_or_default();

    Ok(Json(config))
}
