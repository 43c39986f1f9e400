//! # Discount Resolver
//!
//! Pure functions computing a monetary discount from a promo code and a
//! subtotal, plus the display string shown next to an applied code.
//!
//! ## Rules
//! - No promo → zero discount
//! - Percentage → `subtotal × bps / 10000`, rounded half up, capped at
//!   the subtotal
//! - Fixed → `min(amount, subtotal)` — never discounts more than the
//!   order is worth
//! - Zero or negative configured values resolve to zero. A promo code
//!   must never turn into a surcharge, whatever the data source holds.

use crate::money::Money;
use crate::types::{Discount, PromoCode, TaxRate};

/// Computes the monetary discount an active promo code grants on a
/// subtotal.
///
/// ## Example
/// ```rust
/// use atelier_core::discount::calculate_discount;
/// use atelier_core::money::Money;
/// use atelier_core::types::{Discount, PromoCode};
///
/// let promo = PromoCode {
///     code: "SUMMER10".to_string(),
///     discount: Discount::Percentage { bps: 1000 }, // 10%
///     expires_at: None,
/// };
///
/// let subtotal = Money::from_cents(5000); // $50.00
/// assert_eq!(calculate_discount(Some(&promo), subtotal).cents(), 500);
/// assert_eq!(calculate_discount(None, subtotal).cents(), 0);
/// ```
pub fn calculate_discount(promo: Option<&PromoCode>, subtotal: Money) -> Money {
    let Some(promo) = promo else {
        return Money::zero();
    };

    if !subtotal.is_positive() {
        return Money::zero();
    }

    let raw = match promo.discount {
        Discount::Percentage { bps } => {
            if bps == 0 {
                return Money::zero();
            }
            subtotal.apply_rate(TaxRate::from_bps(bps))
        }
        Discount::Fixed { amount_cents } => {
            if amount_cents <= 0 {
                return Money::zero();
            }
            Money::from_cents(amount_cents)
        }
    };

    // Cap at the subtotal: a 150% code or a $60 code on a $50 order
    // discounts the order to free, not past it.
    if raw > subtotal {
        subtotal
    } else {
        raw
    }
}

/// Formats the discount a promo code grants for display.
///
/// Percentage codes render as `"10%"` (or `"8.25%"` for fractional
/// rates), fixed codes as `"$5.00"`.
pub fn discount_display(promo: &PromoCode) -> String {
    match promo.discount {
        Discount::Percentage { bps } => {
            if bps % 100 == 0 {
                format!("{}%", bps / 100)
            } else {
                let formatted = format!("{:.2}", bps as f64 / 100.0);
                let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
                format!("{}%", trimmed)
            }
        }
        Discount::Fixed { amount_cents } => format!("{}", Money::from_cents(amount_cents)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn percentage(bps: u32) -> PromoCode {
        PromoCode {
            code: "PCT".to_string(),
            discount: Discount::Percentage { bps },
            expires_at: None,
        }
    }

    fn fixed(amount_cents: i64) -> PromoCode {
        PromoCode {
            code: "FIXED".to_string(),
            discount: Discount::Fixed { amount_cents },
            expires_at: None,
        }
    }

    #[test]
    fn test_no_promo_is_zero() {
        assert_eq!(calculate_discount(None, Money::from_cents(5000)).cents(), 0);
    }

    #[test]
    fn test_percentage_discount() {
        // $50.00 at 10% = $5.00
        let promo = percentage(1000);
        assert_eq!(
            calculate_discount(Some(&promo), Money::from_cents(5000)).cents(),
            500
        );
    }

    #[test]
    fn test_percentage_discount_rounding() {
        // $10.99 at 8.25% = $0.9067 → $0.91
        let promo = percentage(825);
        assert_eq!(
            calculate_discount(Some(&promo), Money::from_cents(1099)).cents(),
            91
        );
    }

    #[test]
    fn test_percentage_never_exceeds_subtotal() {
        // 150% caps at the subtotal
        let promo = percentage(15000);
        assert_eq!(
            calculate_discount(Some(&promo), Money::from_cents(5000)).cents(),
            5000
        );
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        // $60.00 off a $50.00 order discounts exactly $50.00
        let promo = fixed(6000);
        assert_eq!(
            calculate_discount(Some(&promo), Money::from_cents(5000)).cents(),
            5000
        );

        // $5.00 off a $50.00 order discounts $5.00
        let promo = fixed(500);
        assert_eq!(
            calculate_discount(Some(&promo), Money::from_cents(5000)).cents(),
            500
        );
    }

    #[test]
    fn test_zero_and_negative_values_resolve_to_zero() {
        assert_eq!(
            calculate_discount(Some(&percentage(0)), Money::from_cents(5000)).cents(),
            0
        );
        assert_eq!(
            calculate_discount(Some(&fixed(0)), Money::from_cents(5000)).cents(),
            0
        );
        // A negative fixed amount must not become a surcharge
        assert_eq!(
            calculate_discount(Some(&fixed(-500)), Money::from_cents(5000)).cents(),
            0
        );
    }

    #[test]
    fn test_zero_subtotal_is_zero_discount() {
        assert_eq!(
            calculate_discount(Some(&percentage(1000)), Money::zero()).cents(),
            0
        );
    }

    #[test]
    fn test_discount_display() {
        assert_eq!(discount_display(&percentage(1000)), "10%");
        assert_eq!(discount_display(&percentage(825)), "8.25%");
        assert_eq!(discount_display(&percentage(1050)), "10.5%");
        assert_eq!(discount_display(&fixed(500)), "$5.00");
    }
}
