//! # Cart Store
//!
//! The working set of items a customer intends to purchase, plus at most
//! one active promo code.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Customer Action          Store API               Cart State Change     │
//! │  ───────────────          ─────────               ─────────────────     │
//! │                                                                         │
//! │  Click "Add to Cart" ────► add_item() ──────────► merge or push item   │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ───► qty clamped [1,99]   │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► items.retain(..)     │
//! │                                                                         │
//! │  Enter Promo ────────────► apply_promo() ───────► promo = Some (swap)  │
//! │                                                                         │
//! │  Remove Promo ───────────► remove_promo() ──────► promo = None         │
//! │                                                                         │
//! │  Click Clear ────────────► clear() ─────────────► items + promo gone   │
//! │                                                                         │
//! │  Totals are recomputed on read: subtotal, discount, total.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `product_id` (adding the same product merges)
//! - Quantity is always within [1, 99]; out-of-range mutations are
//!   ignored or clamped, never errors
//! - At most one promo code is active; applying replaces, never stacks
//! - `total() >= 0` regardless of the active promo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::{calculate_discount, discount_display};
use crate::money::Money;
use crate::types::{Product, PromoCode};
use crate::validation::clamp_quantity;
use crate::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the shopping cart.
///
/// ## Design Notes
/// - `product_id`: Reference to the product (for catalog lookup)
/// - Everything else is a frozen copy of the product at time of adding.
///   The cart displays consistent data even if the product is updated
///   server-side after being added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID (UUID)
    pub product_id: String,

    /// SKU at time of adding (frozen)
    pub sku: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Description at time of adding (frozen)
    pub description: Option<String>,

    /// Image URL at time of adding (frozen)
    pub image_url: Option<String>,

    /// Price in cents at time of adding (frozen)
    /// This is critical: we lock in the price when added to cart
    pub unit_price_cents: i64,

    /// Quantity in cart, always within [1, 99]
    pub quantity: i64,

    /// When this item was added to cart
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart item from a product and quantity.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the product price
    /// changes in the catalog, this cart item retains the original price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            unit_price_cents: product.price_cents,
            quantity: clamp_quantity(quantity),
            added_at: Utc::now(),
        }
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Returns the line total as Money.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: line items plus an optional active promo code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart
    pub items: Vec<CartItem>,

    /// The single active promo code, if any
    pub promo: Option<PromoCode>,

    /// When the cart was created/last cleared
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            promo: None,
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If product already in cart: increases quantity, capped at 99
    /// - If product not in cart: adds new item with quantity in [1, 99]
    ///
    /// Never fails; out-of-range quantities are clamped.
    pub fn add_item(&mut self, product: &Product, quantity: i64) {
        let quantity = clamp_quantity(quantity);

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity = (item.quantity + quantity).min(MAX_ITEM_QUANTITY);
            return;
        }

        self.items.push(CartItem::from_product(product, quantity));
    }

    /// Updates the quantity of an item in the cart.
    ///
    /// ## Behavior
    /// - Quantity below 1: mutation is ignored, prior quantity kept
    /// - Quantity above 99: clamped to 99
    /// - Product not in cart: no-op
    ///
    /// Matches the store's quantity rules everywhere else: invalid input
    /// never errors and never produces an out-of-range quantity.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity < MIN_ITEM_QUANTITY {
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity.min(MAX_ITEM_QUANTITY);
        }
    }

    /// Removes an item from the cart by product ID. No-op if absent.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Clears all items and the active promo code.
    pub fn clear(&mut self) {
        self.items.clear();
        self.promo = None;
        self.created_at = Utc::now();
    }

    /// Sets the active promo code, replacing any previous one.
    ///
    /// Promo codes never stack: the last applied code wins.
    pub fn apply_promo(&mut self, promo: PromoCode) {
        self.promo = Some(promo);
    }

    /// Clears the active promo code.
    pub fn remove_promo(&mut self) {
        self.promo = None;
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calculates the subtotal (before discount).
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.items.iter().map(|i| i.line_total_cents()).sum())
    }

    /// Calculates the discount the active promo code grants.
    pub fn discount(&self) -> Money {
        calculate_discount(self.promo.as_ref(), self.subtotal())
    }

    /// Calculates the cart total: `max(0, subtotal - discount)`.
    ///
    /// Shipping and tax are checkout-time concerns; the cart total is
    /// what the mini-cart shows while shopping.
    pub fn total(&self) -> Money {
        (self.subtotal() - self.discount()).floor_at_zero()
    }

    /// Captures the durable representation of this cart.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            promo: self.promo.clone(),
        }
    }

    /// Restores a cart from a durable snapshot.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        Cart {
            items: snapshot.items,
            promo: snapshot.promo,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Persistence & Totals DTOs
// =============================================================================

/// The serializable cart representation persisted across page reloads.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub promo: Option<PromoCode>,
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    /// Display string for the active promo (e.g. "10%" or "$5.00").
    pub discount_display: Option<String>,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal().cents(),
            discount_cents: cart.discount().cents(),
            total_cents: cart.total().cents(),
            discount_display: cart.promo.as_ref().map(discount_display),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Discount;

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

    fn percentage_promo(bps: u32) -> PromoCode {
        PromoCode {
            code: "PCT".to_string(),
            discount: Discount::Percentage { bps },
            expires_at: None,
        }
    }

    fn fixed_promo(amount_cents: i64) -> PromoCode {
        PromoCode {
            code: "FIXED".to_string(),
            discount: Discount::Fixed { amount_cents },
            expires_at: None,
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let product = test_product("1", 2500); // $25.00

        cart.add_item(&product, 2);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 5000); // $50.00
        assert_eq!(cart.total().cents(), 5000);
    }

    #[test]
    fn test_cart_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_item(&product, 2);
        cart.add_item(&product, 3);

        assert_eq!(cart.item_count(), 1); // Still one unique item
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_add_clamps_at_max() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_item(&product, 80);
        cart.add_item(&product, 80);

        assert_eq!(cart.items[0].quantity, 99);
    }

    #[test]
    fn test_update_quantity_rules() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);
        cart.add_item(&product, 5);

        // In-range update applies
        cart.update_quantity("1", 7);
        assert_eq!(cart.items[0].quantity, 7);

        // Zero is ignored: prior state kept
        cart.update_quantity("1", 0);
        assert_eq!(cart.items[0].quantity, 7);

        // Above max clamps to 99
        cart.update_quantity("1", 100);
        assert_eq!(cart.items[0].quantity, 99);

        // Unknown id is a no-op
        cart.update_quantity("missing", 3);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_item_noop_when_absent() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);
        cart.add_item(&product, 1);

        cart.remove_item("missing");
        assert_eq!(cart.item_count(), 1);

        cart.remove_item("1");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_drops_items_and_promo() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 999), 2);
        cart.apply_promo(percentage_promo(1000));

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.promo.is_none());
    }

    #[test]
    fn test_promo_replaces_never_stacks() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 2500), 2); // $50.00

        cart.apply_promo(percentage_promo(1000)); // 10%
        assert_eq!(cart.discount().cents(), 500);

        cart.apply_promo(fixed_promo(300)); // replaces the 10% code
        assert_eq!(cart.promo.as_ref().unwrap().code, "FIXED");
        assert_eq!(cart.discount().cents(), 300);
    }

    #[test]
    fn test_percentage_promo_total() {
        // $25.00 × 2 with 10% off ⇒ discount $5.00, total $45.00
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 2500), 2);
        cart.apply_promo(percentage_promo(1000));

        assert_eq!(cart.subtotal().cents(), 5000);
        assert_eq!(cart.discount().cents(), 500);
        assert_eq!(cart.total().cents(), 4500);
    }

    #[test]
    fn test_fixed_promo_capped_total_floors_at_zero() {
        // $25.00 × 2 with $60.00 off ⇒ discount caps at $50.00, total $0.00
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 2500), 2);
        cart.apply_promo(fixed_promo(6000));

        assert_eq!(cart.discount().cents(), 5000);
        assert_eq!(cart.total().cents(), 0);
    }

    #[test]
    fn test_remove_promo() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 2500), 2);
        cart.apply_promo(percentage_promo(1000));

        cart.remove_promo();

        assert!(cart.promo.is_none());
        assert_eq!(cart.total().cents(), 5000);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 2500), 2);
        cart.apply_promo(percentage_promo(1000));

        let snapshot = cart.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = Cart::from_snapshot(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.items, cart.items);
        assert_eq!(restored.promo, cart.promo);
        assert_eq!(restored.total().cents(), cart.total().cents());
    }

    #[test]
    fn test_totals_dto() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 2500), 2);
        cart.apply_promo(percentage_promo(1000));

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.subtotal_cents, 5000);
        assert_eq!(totals.discount_cents, 500);
        assert_eq!(totals.total_cents, 4500);
        assert_eq!(totals.discount_display.as_deref(), Some("10%"));
    }
}
