//! # Payment Session Boundary
//!
//! The `SessionCreator` trait is the seam between the storefront and
//! whatever processor hosts the payment page.
//!
//! ## Handoff Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Creation                                     │
//! │                                                                         │
//! │  Checkout Assembler (atelier-core)                                     │
//! │       │  PricedOrder: integer cents, ordered line items               │
//! │       ▼                                                                 │
//! │  SessionRequest { order, customer, clientReference }                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionCreator::create_session(...)   ← THIS TRAIT                   │
//! │       │                                                                 │
//! │       ├── Ok(HostedSession { id, url }) → redirect customer to url    │
//! │       │                                                                 │
//! │       └── Err(PaymentError) → surfaced verbatim, NO retry             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, PaymentResult};
use atelier_core::types::CustomerDetails;
use atelier_core::PricedOrder;

// =============================================================================
// DTOs
// =============================================================================

/// Everything the processor needs to host a checkout page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    /// The assembled, fully priced order.
    pub order: PricedOrder,

    /// Customer details (email is forwarded to the processor).
    pub customer: CustomerDetails,

    /// Opaque reference tying the session back to the client session.
    pub client_reference: String,
}

/// A created hosted-checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedSession {
    /// Processor-side session ID.
    pub id: String,

    /// URL to redirect the customer to.
    pub url: String,
}

// =============================================================================
// Trait Seam
// =============================================================================

/// Creates hosted payment sessions from assembled orders.
///
/// Implementations must not retry on failure; the caller surfaces the
/// error terminally and the customer resubmits.
#[async_trait]
pub trait SessionCreator: Send + Sync {
    /// Turns an assembled order into a hosted checkout session.
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<HostedSession>;
}

// =============================================================================
// Mock Implementation
// =============================================================================

/// In-memory session creator for tests.
///
/// Records the last request and returns a canned URL, or a configured
/// failure.
#[derive(Debug, Default)]
pub struct MockSessionCreator {
    last_request: Mutex<Option<SessionRequest>>,
    fail_with: Mutex<Option<String>>,
}

impl MockSessionCreator {
    /// Creates a mock that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// Returns the last request seen, if any.
    pub fn last_request(&self) -> Option<SessionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionCreator for MockSessionCreator {
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<HostedSession> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(PaymentError::Processor(message));
        }

        Ok(HostedSession {
            id: format!("cs_test_{}", request.client_reference),
            url: format!(
                "https://checkout.example/pay/{}",
                request.client_reference
            ),
        })
    }
}

// =============================================================================
// Unconfigured Implementation
// =============================================================================

/// Session creator used when no payment processor is configured.
///
/// A shop fresh out of the install flow may not have payment keys yet.
/// The storefront still boots and the cart works; only checkout
/// submission fails, with the configuration error surfaced verbatim.
#[derive(Debug, Default)]
pub struct UnconfiguredSessionCreator;

#[async_trait]
impl SessionCreator for UnconfiguredSessionCreator {
    async fn create_session(&self, _request: &SessionRequest) -> PaymentResult<HostedSession> {
        Err(PaymentError::Config(
            "payment processing is not configured".into(),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::checkout::{LineItemKind, OrderLineItem};

    fn request() -> SessionRequest {
        SessionRequest {
            order: PricedOrder {
                line_items: vec![OrderLineItem {
                    name: "Candle".to_string(),
                    description: None,
                    unit_amount_cents: 2500,
                    quantity: 2,
                    kind: LineItemKind::Product,
                }],
                subtotal_cents: 5000,
                discount_cents: 0,
                tax_cents: 0,
                shipping_cents: 0,
                total_cents: 5000,
                currency: "usd".to_string(),
                promo_code: None,
            },
            customer: CustomerDetails {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                country: "CA".to_string(),
                region: "BC".to_string(),
                phone: None,
            },
            client_reference: "session-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_success_records_request() {
        let creator = MockSessionCreator::new();

        let session = creator.create_session(&request()).await.unwrap();
        assert!(session.url.contains("session-1"));

        let seen = creator.last_request().unwrap();
        assert_eq!(seen.order.total_cents, 5000);
    }

    #[tokio::test]
    async fn test_mock_failure_is_terminal() {
        let creator = MockSessionCreator::new();
        creator.fail_with("processor unavailable");

        let err = creator.create_session(&request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Processor(_)));
        assert!(err.to_string().contains("processor unavailable"));
    }
}
