//! # Promo Code Repository
//!
//! Lookup and maintenance of promo codes.
//!
//! ## Lookup Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User enters " summer10 "                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize → "SUMMER10"                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... WHERE code = 'SUMMER10' AND is_active = 1                  │
//! │       │                                                                 │
//! │       ├── no row        → Ok(None)   "not found"                       │
//! │       ├── expired row   → Ok(None)   expired codes ARE not-found       │
//! │       └── live row      → Ok(Some(PromoCode))                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use atelier_core::types::{Discount, PromoCode};

/// Row mapping for the promo_codes table.
///
/// `kind`/`value` encoding: percentage rows hold basis points, fixed
/// rows hold cents.
#[derive(Debug, sqlx::FromRow)]
struct PromoRow {
    code: String,
    kind: String,
    value: i64,
    expires_at: Option<DateTime<Utc>>,
}

impl PromoRow {
    fn into_promo(self) -> DbResult<PromoCode> {
        let discount = match self.kind.as_str() {
            // Negative stored values are clamped here; the resolver
            // treats zero as "no discount"
            "percentage" => Discount::Percentage {
                bps: self.value.max(0) as u32,
            },
            "fixed" => Discount::Fixed {
                amount_cents: self.value,
            },
            other => {
                return Err(DbError::Serialization(format!(
                    "unknown promo kind '{}' for code {}",
                    other, self.code
                )))
            }
        };

        Ok(PromoCode {
            code: self.code,
            discount,
            expires_at: self.expires_at,
        })
    }
}

/// Repository for promo code operations.
#[derive(Debug, Clone)]
pub struct PromoRepository {
    pool: SqlitePool,
}

impl PromoRepository {
    /// Creates a new PromoRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PromoRepository { pool }
    }

    /// Looks up a promo code by its user-entered form.
    ///
    /// The code is normalized (trimmed, uppercased) before lookup.
    /// Inactive and expired codes resolve to `Ok(None)` - callers treat
    /// both exactly like an unknown code.
    pub async fn get_by_code(&self, raw_code: &str) -> DbResult<Option<PromoCode>> {
        let code = PromoCode::normalize(raw_code);
        debug!(code = %code, "Looking up promo code");

        let row = sqlx::query_as::<_, PromoRow>(
            r#"
            SELECT code, kind, value, expires_at
            FROM promo_codes
            WHERE code = ?1 AND is_active = 1
            "#,
        )
        .bind(&code)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let promo = row.into_promo()?;

        if promo.is_expired(Utc::now()) {
            debug!(code = %code, "Promo code is expired");
            return Ok(None);
        }

        Ok(Some(promo))
    }

    /// Inserts or updates a promo code.
    pub async fn upsert(&self, promo: &PromoCode) -> DbResult<()> {
        let (kind, value) = match promo.discount {
            Discount::Percentage { bps } => ("percentage", bps as i64),
            Discount::Fixed { amount_cents } => ("fixed", amount_cents),
        };

        let code = PromoCode::normalize(&promo.code);
        debug!(code = %code, kind = %kind, "Upserting promo code");

        sqlx::query(
            r#"
            INSERT INTO promo_codes (code, kind, value, expires_at, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5)
            ON CONFLICT(code) DO UPDATE SET
                kind = excluded.kind,
                value = excluded.value,
                expires_at = excluded.expires_at,
                is_active = 1
            "#,
        )
        .bind(&code)
        .bind(kind)
        .bind(value)
        .bind(promo.expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deactivates a promo code. Lookups treat it as not-found.
    pub async fn deactivate(&self, raw_code: &str) -> DbResult<()> {
        let code = PromoCode::normalize(raw_code);

        let result = sqlx::query("UPDATE promo_codes SET is_active = 0 WHERE code = ?1")
            .bind(&code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Promo code", &code));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    fn promo(code: &str, discount: Discount, expires_at: Option<DateTime<Utc>>) -> PromoCode {
        PromoCode {
            code: code.to_string(),
            discount,
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_lookup_normalizes_code() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.promos();

        repo.upsert(&promo(
            "SUMMER10",
            Discount::Percentage { bps: 1000 },
            None,
        ))
        .await
        .unwrap();

        let found = repo.get_by_code(" summer10 ").await.unwrap().unwrap();
        assert_eq!(found.code, "SUMMER10");
        assert_eq!(found.discount, Discount::Percentage { bps: 1000 });
    }

    #[tokio::test]
    async fn test_unknown_code_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.promos();

        assert!(repo.get_by_code("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_code_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.promos();

        repo.upsert(&promo(
            "OLD",
            Discount::Fixed { amount_cents: 500 },
            Some(Utc::now() - Duration::days(1)),
        ))
        .await
        .unwrap();

        assert!(repo.get_by_code("OLD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deactivated_code_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.promos();

        repo.upsert(&promo("GONE", Discount::Fixed { amount_cents: 500 }, None))
            .await
            .unwrap();
        repo.deactivate("gone").await.unwrap();

        assert!(repo.get_by_code("GONE").await.unwrap().is_none());
    }
}
