//! # atelier-core: Pure Business Logic for Atelier
//!
//! This crate is the **heart** of Atelier. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atelier Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout UI ──► Hosted Payment   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  Storefront API (axum)                          │   │
//! │  │    cart ops, promo apply, checkout submit                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ atelier-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ discount  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ resolver  │  │   │
//! │  │   │ PromoCode │  │  TaxCalc  │  │ CartItem  │  │  display  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ checkout  │  │ validation│                                 │   │
//! │  │   │ assembler │  │   rules   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │       atelier-db (SQLite)      atelier-payments (Stripe)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, PromoCode, ShippingOption, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart store and its mutation API
//! - [`discount`] - Promo code discount resolution
//! - [`checkout`] - Checkout assembly into a priced order
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use atelier_core::discount::calculate_discount;
//! use atelier_core::money::Money;
//! use atelier_core::types::{Discount, PromoCode};
//!
//! let promo = PromoCode {
//!     code: "SUMMER10".to_string(),
//!     discount: Discount::Percentage { bps: 1000 }, // 10%
//!     expires_at: None,
//! };
//!
//! // $50.00 subtotal, 10% off
//! let discount = calculate_discount(Some(&promo), Money::from_cents(5000));
//! assert_eq!(discount.cents(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use atelier_core::Money` instead of
// `use atelier_core::money::Money`

pub use cart::{Cart, CartItem, CartSnapshot, CartTotals};
pub use checkout::{LineItemKind, OrderLineItem, PricedOrder};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum quantity of a single item in the cart.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Maximum quantity of a single item in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10)
/// and keeps a single order within fulfilment limits. Enforced in the
/// cart store AND re-applied at checkout assembly, since direct API
/// calls can bypass the cart path.
pub const MAX_ITEM_QUANTITY: i64 = 99;
