//! # Validation Module
//!
//! Input validation utilities for Atelier.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handler (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout assembler                                           │
//! │  ├── Quantity re-clamping                                              │
//! │  └── Unit price checks                                                 │
//! │                                                                         │
//! │  The frontend path already enforces most of this, but direct API       │
//! │  calls don't go through the frontend. Layers 2 and 3 are the ones      │
//! │  that hold.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CustomerDetails;
use crate::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity Rules
// =============================================================================

/// Clamps a quantity into the accepted range [1, 99].
///
/// ## Example
/// ```rust
/// use atelier_core::validation::clamp_quantity;
///
/// assert_eq!(clamp_quantity(5), 5);
/// assert_eq!(clamp_quantity(0), 1);
/// assert_eq!(clamp_quantity(100), 99);
/// ```
#[inline]
pub const fn clamp_quantity(qty: i64) -> i64 {
    if qty < MIN_ITEM_QUANTITY {
        MIN_ITEM_QUANTITY
    } else if qty > MAX_ITEM_QUANTITY {
        MAX_ITEM_QUANTITY
    } else {
        qty
    }
}

/// Validates a quantity value without clamping it.
///
/// ## Rules
/// - Must be between MIN_ITEM_QUANTITY (1) and MAX_ITEM_QUANTITY (99)
///
/// Used where an out-of-range value should be reported rather than
/// silently adjusted.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < MIN_ITEM_QUANTITY || qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be strictly positive; the catalog has no free or negative items
///
/// ## Example
/// ```rust
/// use atelier_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(2500).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a user-entered promo code before lookup.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 40 characters
/// - Letters, numbers, hyphens, underscores only
///
/// ## Returns
/// The normalized (trimmed, uppercased) code.
pub fn validate_promo_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "promo code".to_string(),
        });
    }

    if code.len() > 40 {
        return Err(ValidationError::TooLong {
            field: "promo code".to_string(),
            max: 40,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "promo code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_uppercase())
}

/// Validates an email address.
///
/// ## Rules
/// - Non-empty, at most 254 characters
/// - Exactly one '@' with non-empty local part and a dotted domain
///
/// Deliberately a plausibility check, not RFC 5322; the mail provider
/// is the real arbiter.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a country code (ISO 3166-1 alpha-2).
pub fn validate_country(country: &str) -> ValidationResult<()> {
    let country = country.trim();

    if country.is_empty() {
        return Err(ValidationError::Required {
            field: "country".to_string(),
        });
    }

    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "country".to_string(),
            reason: "must be a two-letter country code".to_string(),
        });
    }

    Ok(())
}

/// Validates the full customer details block captured at checkout.
///
/// ## Rules
/// - Name, email, country and region are required
/// - Email and country must be well-formed
/// - Phone is optional
pub fn validate_customer(customer: &CustomerDetails) -> ValidationResult<()> {
    if customer.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if customer.name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    validate_email(&customer.email)?;
    validate_country(&customer.country)?;

    if customer.region.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "region".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            country: "CA".to_string(),
            region: "BC".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(1), 1);
        assert_eq!(clamp_quantity(99), 99);
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(-5), 1);
        assert_eq!(clamp_quantity(100), 99);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(2500).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_promo_code() {
        assert_eq!(validate_promo_code(" summer10 ").unwrap(), "SUMMER10");
        assert_eq!(validate_promo_code("WELCOME-5").unwrap(), "WELCOME-5");

        assert!(validate_promo_code("").is_err());
        assert!(validate_promo_code("   ").is_err());
        assert!(validate_promo_code("has space").is_err());
        assert!(validate_promo_code(&"A".repeat(50)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@nodot").is_err());
        assert!(validate_email("ada@dot.").is_err());
    }

    #[test]
    fn test_validate_country() {
        assert!(validate_country("CA").is_ok());
        assert!(validate_country("us").is_ok());
        assert!(validate_country("").is_err());
        assert!(validate_country("CAN").is_err());
        assert!(validate_country("C1").is_err());
    }

    #[test]
    fn test_validate_customer() {
        assert!(validate_customer(&customer()).is_ok());

        let mut no_name = customer();
        no_name.name = "  ".to_string();
        assert!(validate_customer(&no_name).is_err());

        let mut bad_email = customer();
        bad_email.email = "nope".to_string();
        assert!(validate_customer(&bad_email).is_err());

        let mut no_region = customer();
        no_region.region = String::new();
        assert!(validate_customer(&no_region).is_err());
    }
}
