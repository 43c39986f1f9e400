//! # Checkout Assembler
//!
//! Combines cart state, shipping selection, tax configuration and the
//! active promo code into a priced order payload at the moment of
//! checkout submission.
//!
//! ## Assembly Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Assembly                                    │
//! │                                                                         │
//! │  items[] ──► guard: non-empty, positive prices, clamped quantities     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  subtotal = Σ price × qty          guard: > 0                          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  discount = resolve(promo, subtotal)                                   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  tax = subtotal × (gst + pst + hst) / 10000                            │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  total = subtotal − discount + tax + shipping                          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  PricedOrder: [products..., shipping, tax, −discount] + totals         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Payment Session Creator (atelier-payments)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Defensive Clamping
//! The cart store already keeps quantities in [1, 99] and prices
//! positive, but checkout payloads can arrive from direct API calls
//! that never touched the cart path. The assembler re-applies both
//! rules rather than trusting its caller.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::calculate_discount;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CustomerDetails, PromoCode, ShippingOption, TaxConfig};
use crate::validation::{clamp_quantity, validate_customer};
use crate::CartItem;

// =============================================================================
// Priced Order
// =============================================================================

/// What a line item on the assembled order represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Product,
    Shipping,
    Tax,
    Discount,
}

/// A single priced line on the assembled order.
///
/// `unit_amount_cents` is negative exactly once: on the discount line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub name: String,
    pub description: Option<String>,
    /// Unit amount in integer cents; negative for the discount line.
    pub unit_amount_cents: i64,
    pub quantity: i64,
    pub kind: LineItemKind,
}

/// The fully priced order handed to the payment session creator.
///
/// ## Invariant
/// `total = subtotal - discount + tax + shipping`, every component
/// non-negative, `discount <= subtotal`, all amounts in integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedOrder {
    /// Ordered lines: products, then shipping, then tax, then discount.
    pub line_items: Vec<OrderLineItem>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    /// Currency code (ISO 4217, lowercase), from the shipping option.
    pub currency: String,
    /// The applied promo code, for payment metadata and the order record.
    pub promo_code: Option<String>,
}

impl PricedOrder {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Assembles a priced order from cart items, customer details, the
/// selected shipping option, the regional tax configuration and the
/// active promo code.
///
/// ## Failure Semantics
/// - Empty item list → `CoreError::EmptyCart`
/// - Zero subtotal → `CoreError::ZeroSubtotal`
/// - Non-positive unit price → `CoreError::InvalidUnitPrice`
/// - Malformed customer details → `CoreError::Validation`
///
/// All rejections happen before any payment session is created.
pub fn assemble(
    items: &[CartItem],
    customer: &CustomerDetails,
    shipping: &ShippingOption,
    tax_config: &TaxConfig,
    promo: Option<&PromoCode>,
) -> CoreResult<PricedOrder> {
    if items.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    validate_customer(customer)?;

    // Re-clamp quantities and check prices: direct API callers bypass
    // the cart store's rules.
    let mut line_items = Vec::with_capacity(items.len() + 3);
    let mut subtotal = Money::zero();

    for item in items {
        if item.unit_price_cents <= 0 {
            return Err(CoreError::InvalidUnitPrice {
                name: item.name.clone(),
                cents: item.unit_price_cents,
            });
        }

        let quantity = clamp_quantity(item.quantity);
        subtotal += Money::from_cents(item.unit_price_cents).multiply_quantity(quantity);

        line_items.push(OrderLineItem {
            name: item.name.clone(),
            description: item.description.clone(),
            unit_amount_cents: item.unit_price_cents,
            quantity,
            kind: LineItemKind::Product,
        });
    }

    if !subtotal.is_positive() {
        return Err(CoreError::ZeroSubtotal);
    }

    let discount = calculate_discount(promo, subtotal);
    let tax = subtotal.apply_rate(tax_config.combined());
    let shipping_cost = shipping.price().floor_at_zero();
    let total = subtotal - discount + tax + shipping_cost;

    line_items.push(OrderLineItem {
        name: shipping.name.clone(),
        description: Some(format!("Estimated {} days", shipping.estimated_days)),
        unit_amount_cents: shipping_cost.cents(),
        quantity: 1,
        kind: LineItemKind::Shipping,
    });

    if tax.is_positive() {
        line_items.push(OrderLineItem {
            name: "Taxes".to_string(),
            description: None,
            unit_amount_cents: tax.cents(),
            quantity: 1,
            kind: LineItemKind::Tax,
        });
    }

    if discount.is_positive() {
        // The discount rides along as a line with a negative unit amount
        line_items.push(OrderLineItem {
            name: match promo {
                Some(p) => format!("Discount ({})", p.code),
                None => "Discount".to_string(),
            },
            description: None,
            unit_amount_cents: -discount.cents(),
            quantity: 1,
            kind: LineItemKind::Discount,
        });
    }

    Ok(PricedOrder {
        line_items,
        subtotal_cents: subtotal.cents(),
        discount_cents: discount.cents(),
        tax_cents: tax.cents(),
        shipping_cents: shipping_cost.cents(),
        total_cents: total.floor_at_zero().cents(),
        currency: shipping.currency.clone(),
        promo_code: promo.map(|p| p.code.clone()),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
