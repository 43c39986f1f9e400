//! # Rates Repository
//!
//! Regional tax configuration and shipping options. Both are
//! shop-settings data maintained externally; the storefront only reads
//! them at checkout time.
//!
//! Tax rows carry the rates that apply to a region; rates that do not
//! apply are stored as zero, so the assembler can sum blindly.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use atelier_core::types::{ShippingOption, TaxConfig};

/// Row mapping for the tax_rates table.
#[derive(Debug, sqlx::FromRow)]
struct TaxRow {
    gst_bps: i64,
    pst_bps: i64,
    hst_bps: i64,
}

impl From<TaxRow> for TaxConfig {
    fn from(row: TaxRow) -> Self {
        TaxConfig::from_bps(
            row.gst_bps.max(0) as u32,
            row.pst_bps.max(0) as u32,
            row.hst_bps.max(0) as u32,
        )
    }
}

/// Row mapping for the shipping_options table.
#[derive(Debug, sqlx::FromRow)]
struct ShippingRow {
    id: String,
    country: String,
    name: String,
    price_cents: i64,
    currency: String,
    estimated_days: i64,
}

impl From<ShippingRow> for ShippingOption {
    fn from(row: ShippingRow) -> Self {
        ShippingOption {
            id: row.id,
            country: row.country,
            name: row.name,
            price_cents: row.price_cents,
            currency: row.currency,
            estimated_days: row.estimated_days,
        }
    }
}

/// Repository for tax and shipping rate lookups.
#[derive(Debug, Clone)]
pub struct RatesRepository {
    pool: SqlitePool,
}

impl RatesRepository {
    /// Creates a new RatesRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RatesRepository { pool }
    }

    /// Gets the tax configuration for a customer region.
    ///
    /// ## Returns
    /// * `Ok(Some(TaxConfig))` - Region has configured rates
    /// * `Ok(None)` - Unknown region; callers decide the fallback
    pub async fn tax_for_region(&self, region: &str) -> DbResult<Option<TaxConfig>> {
        debug!(region = %region, "Fetching tax configuration");

        let row = sqlx::query_as::<_, TaxRow>(
            r#"
            SELECT gst_bps, pst_bps, hst_bps
            FROM tax_rates
            WHERE region = ?1
            "#,
        )
        .bind(region)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TaxConfig::from))
    }

    /// Inserts or updates the tax configuration for a region.
    pub async fn upsert_tax(&self, region: &str, config: &TaxConfig) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tax_rates (region, gst_bps, pst_bps, hst_bps, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(region) DO UPDATE SET
                gst_bps = excluded.gst_bps,
                pst_bps = excluded.pst_bps,
                hst_bps = excluded.hst_bps,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(region)
        .bind(config.gst.bps() as i64)
        .bind(config.pst.bps() as i64)
        .bind(config.hst.bps() as i64)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists active shipping options for a destination country,
    /// cheapest first.
    pub async fn shipping_for_country(&self, country: &str) -> DbResult<Vec<ShippingOption>> {
        debug!(country = %country, "Fetching shipping options");

        let rows = sqlx::query_as::<_, ShippingRow>(
            r#"
            SELECT id, country, name, price_cents, currency, estimated_days
            FROM shipping_options
            WHERE country = ?1 AND is_active = 1
            ORDER BY price_cents
            "#,
        )
        .bind(country)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ShippingOption::from).collect())
    }

    /// Gets a shipping option by its ID.
    pub async fn shipping_by_id(&self, id: &str) -> DbResult<Option<ShippingOption>> {
        let row = sqlx::query_as::<_, ShippingRow>(
            r#"
            SELECT id, country, name, price_cents, currency, estimated_days
            FROM shipping_options
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ShippingOption::from))
    }

    /// Inserts or updates a shipping option.
    pub async fn upsert_shipping(&self, option: &ShippingOption) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shipping_options (
                id, country, name, price_cents, currency, estimated_days, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
            ON CONFLICT(id) DO UPDATE SET
                country = excluded.country,
                name = excluded.name,
                price_cents = excluded.price_cents,
                currency = excluded.currency,
                estimated_days = excluded.estimated_days,
                is_active = 1
            "#,
        )
        .bind(&option.id)
        .bind(&option.country)
        .bind(&option.name)
        .bind(option.price_cents)
        .bind(&option.currency)
        .bind(option.estimated_days)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
