//! # Domain Types
//!
//! Core domain types used throughout Atelier.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   PromoCode     │   │ ShippingOption  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  code (unique)  │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  discount       │   │  country        │       │
//! │  │  name           │   │  expires_at     │   │  price_cents    │       │
//! │  │  price_cents    │   └─────────────────┘   │  estimated_days │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   TaxConfig     │   │ CustomerDetails │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  gst, pst, hst  │   │  name, email    │       │
//! │  │  500 = 5%       │   │  (per region)   │   │  country, region│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Catalog entities have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, promo code) - human-readable, potentially mutable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (e.g., Canadian GST)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in the cart and on the checkout page.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Optional product image URL.
    pub image_url: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Promo Codes
// =============================================================================

/// The discount a promo code grants.
///
/// ## Representation
/// - `Percentage` carries basis points (1000 = 10%) so percentage math
///   shares the integer rounding path with tax calculation.
/// - `Fixed` carries cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage off the subtotal.
    Percentage { bps: u32 },
    /// Fixed amount off, capped at the subtotal.
    Fixed { amount_cents: i64 },
}

/// A promo code fetched from the promo data source.
///
/// Immutable once fetched; at most one promo code is active in a cart
/// at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// Normalized code (trimmed, uppercased).
    pub code: String,

    /// The discount this code grants.
    pub discount: Discount,

    /// Optional expiry; codes past this instant resolve to not-found.
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl PromoCode {
    /// Normalizes a user-entered code for lookup and comparison.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::types::PromoCode;
    ///
    /// assert_eq!(PromoCode::normalize(" summer10 "), "SUMMER10");
    /// ```
    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Checks whether the code is expired at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => now > expiry,
            None => false,
        }
    }
}

// =============================================================================
// Tax Configuration
// =============================================================================

/// Regional tax configuration.
///
/// The rates that apply to a given customer region are resolved by the
/// shop-settings data source; rates that do not apply arrive as zero.
/// This type only sums and applies what it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    /// Goods and services tax.
    pub gst: TaxRate,
    /// Provincial sales tax.
    pub pst: TaxRate,
    /// Harmonized sales tax.
    pub hst: TaxRate,
}

impl TaxConfig {
    /// Creates a tax configuration from basis points.
    pub const fn from_bps(gst: u32, pst: u32, hst: u32) -> Self {
        TaxConfig {
            gst: TaxRate::from_bps(gst),
            pst: TaxRate::from_bps(pst),
            hst: TaxRate::from_bps(hst),
        }
    }

    /// Combined rate applied to the subtotal.
    pub const fn combined(&self) -> TaxRate {
        TaxRate::from_bps(self.gst.bps() + self.pst.bps() + self.hst.bps())
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// A shipping option offered for a destination country.
/// One option is selected per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Destination country code (ISO 3166-1 alpha-2).
    pub country: String,

    /// Display name (e.g. "Standard Shipping").
    pub name: String,

    /// Shipping cost in cents.
    pub price_cents: i64,

    /// Currency code (ISO 4217, lowercase).
    pub currency: String,

    /// Estimated delivery time in days.
    pub estimated_days: i64,
}

impl ShippingOption {
    /// Returns the shipping cost as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Customer Details
// =============================================================================

/// Customer details captured on the checkout form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    /// Country code (ISO 3166-1 alpha-2).
    pub country: String,
    /// Region/province within the country (drives tax lookup).
    pub region: String,
    pub phone: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(5.0);
        assert_eq!(rate.bps(), 500);
    }

    #[test]
    fn test_tax_config_combined() {
        let config = TaxConfig::from_bps(500, 700, 0);
        assert_eq!(config.combined().bps(), 1200);
    }

    #[test]
    fn test_promo_normalize() {
        assert_eq!(PromoCode::normalize("  summer10 "), "SUMMER10");
        assert_eq!(PromoCode::normalize("WELCOME"), "WELCOME");
    }

    #[test]
    fn test_promo_expiry() {
        let now = Utc::now();
        let expired = PromoCode {
            code: "OLD".to_string(),
            discount: Discount::Percentage { bps: 1000 },
            expires_at: Some(now - Duration::days(1)),
        };
        let current = PromoCode {
            code: "NEW".to_string(),
            discount: Discount::Percentage { bps: 1000 },
            expires_at: Some(now + Duration::days(1)),
        };
        let evergreen = PromoCode {
            code: "EVER".to_string(),
            discount: Discount::Fixed { amount_cents: 500 },
            expires_at: None,
        };

        assert!(expired.is_expired(now));
        assert!(!current.is_expired(now));
        assert!(!evergreen.is_expired(now));
    }

    #[test]
    fn test_discount_serde_tags() {
        let pct = Discount::Percentage { bps: 1000 };
        let json = serde_json::to_string(&pct).unwrap();
        assert!(json.contains("\"type\":\"percentage\""));

        let fixed: Discount = serde_json::from_str(
            r#"{"type":"fixed","amount_cents":500}"#,
        )
        .unwrap();
        assert_eq!(fixed, Discount::Fixed { amount_cents: 500 });
    }
}
