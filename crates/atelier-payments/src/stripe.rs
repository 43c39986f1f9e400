//! Stripe Hosted Checkout Integration
//!
//! Implements `SessionCreator` with the "Stripe Checkout (Hosted)"
//! approach: the assembled order becomes a one-time-payment checkout
//! session and the customer is redirected to Stripe's hosted page.
//!
//! Line items are forwarded exactly as assembled - integer cents, one
//! line per product plus shipping, tax, and the negative discount line.

use async_trait::async_trait;
use std::collections::HashMap;
// Leading :: disambiguates the stripe crate from this module's own path
use ::stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};
use tracing::{info, warn};

use crate::error::{PaymentError, PaymentResult};
use crate::session::{HostedSession, SessionCreator, SessionRequest};
use atelier_core::PricedOrder;

/// Stripe-backed session creator.
pub struct StripeCheckout {
    client: Client,
    success_url: String,
    cancel_url: String,
}

impl StripeCheckout {
    /// Creates a new Stripe session creator.
    pub fn new(
        secret_key: &str,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        StripeCheckout {
            client: Client::new(secret_key),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    /// Creates a session creator from environment variables.
    ///
    /// ## Environment Variables
    /// - `STRIPE_SECRET_KEY` (required)
    /// - `CHECKOUT_SUCCESS_URL` (required)
    /// - `CHECKOUT_CANCEL_URL` (required)
    pub fn from_env() -> PaymentResult<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        let success_url = std::env::var("CHECKOUT_SUCCESS_URL")
            .map_err(|_| PaymentError::Config("CHECKOUT_SUCCESS_URL not set".into()))?;
        let cancel_url = std::env::var("CHECKOUT_CANCEL_URL")
            .map_err(|_| PaymentError::Config("CHECKOUT_CANCEL_URL not set".into()))?;

        Ok(Self::new(&secret_key, success_url, cancel_url))
    }

    /// Get the underlying Stripe client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Maps an ISO 4217 code to a Stripe currency, falling back to USD.
fn currency_from_code(code: &str) -> Currency {
    match code.to_lowercase().as_str() {
        "usd" => Currency::USD,
        "cad" => Currency::CAD,
        "eur" => Currency::EUR,
        "gbp" => Currency::GBP,
        "aud" => Currency::AUD,
        other => {
            warn!(currency = %other, "Unsupported currency, falling back to usd");
            Currency::USD
        }
    }
}

/// Builds Stripe line items from the assembled order.
///
/// The discount line keeps its negative unit amount: the session total
/// must equal the assembler's total to the cent.
fn line_items_from_order(order: &PricedOrder) -> Vec<CreateCheckoutSessionLineItems> {
    let currency = currency_from_code(&order.currency);

    order
        .line_items
        .iter()
        .map(|line| CreateCheckoutSessionLineItems {
            quantity: Some(line.quantity.max(1) as u64),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency,
                unit_amount: Some(line.unit_amount_cents),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: line.name.clone(),
                    description: line.description.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
        .collect()
}

#[async_trait]
impl SessionCreator for StripeCheckout {
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<HostedSession> {
        if request.order.total_cents <= 0 {
            return Err(PaymentError::InvalidRequest(
                "order total must be positive".into(),
            ));
        }

        let line_items = line_items_from_order(&request.order);

        let mut metadata = HashMap::new();
        metadata.insert(
            "client_reference".to_string(),
            request.client_reference.clone(),
        );
        if let Some(ref code) = request.order.promo_code {
            metadata.insert("promo_code".to_string(), code.clone());
        }

        let mut params = CreateCheckoutSession::new();
        params.customer_email = Some(&request.customer.email);
        params.success_url = Some(&self.success_url);
        params.cancel_url = Some(&self.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.client_reference_id = Some(&request.client_reference);
        params.metadata = Some(metadata);
        params.line_items = Some(line_items);

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Processor(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Processor("No checkout URL returned".into()))?;

        info!(
            session_id = %session.id,
            total_cents = request.order.total_cents,
            "Stripe checkout session created"
        );

        Ok(HostedSession {
            id: session.id.to_string(),
            url,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::checkout::{LineItemKind, OrderLineItem};

    fn order_with_discount() -> PricedOrder {
        PricedOrder {
            line_items: vec![
                OrderLineItem {
                    name: "Candle".to_string(),
                    description: None,
                    unit_amount_cents: 2500,
                    quantity: 2,
                    kind: LineItemKind::Product,
                },
                OrderLineItem {
                    name: "Standard Shipping".to_string(),
                    description: Some("Estimated 5 days".to_string()),
                    unit_amount_cents: 1000,
                    quantity: 1,
                    kind: LineItemKind::Shipping,
                },
                OrderLineItem {
                    name: "Discount (SUMMER10)".to_string(),
                    description: None,
                    unit_amount_cents: -500,
                    quantity: 1,
                    kind: LineItemKind::Discount,
                },
            ],
            subtotal_cents: 5000,
            discount_cents: 500,
            tax_cents: 0,
            shipping_cents: 1000,
            total_cents: 5500,
            currency: "usd".to_string(),
            promo_code: Some("SUMMER10".to_string()),
        }
    }

    #[test]
    fn test_currency_mapping() {
        assert_eq!(currency_from_code("usd"), Currency::USD);
        assert_eq!(currency_from_code("CAD"), Currency::CAD);
        assert_eq!(currency_from_code("xyz"), Currency::USD);
    }

    #[test]
    fn test_line_items_preserve_amounts() {
        let items = line_items_from_order(&order_with_discount());
        assert_eq!(items.len(), 3);

        let amounts: Vec<i64> = items
            .iter()
            .map(|i| i.price_data.as_ref().unwrap().unit_amount.unwrap())
            .collect();
        assert_eq!(amounts, vec![2500, 1000, -500]);

        // Session total equals the assembler total to the cent
        let session_total: i64 = items
            .iter()
            .map(|i| {
                i.price_data.as_ref().unwrap().unit_amount.unwrap()
                    * i.quantity.unwrap() as i64
            })
            .sum();
        assert_eq!(session_total, 5500);
    }

    #[test]
    fn test_from_env_requires_key() {
        // Guard against ambient configuration leaking into the test
        std::env::remove_var("STRIPE_SECRET_KEY");
        assert!(matches!(
            StripeCheckout::from_env(),
            Err(PaymentError::Config(_))
        ));
    }
}
