//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## The Catalog Is a Read-Side Copy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                Catalog Snapshot Flow                                    │
//! │                                                                         │
//! │  Hosted catalog changes server-side                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storefront receives a FULL snapshot                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  replace_all(snapshot) ← one transaction, delete + insert              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Readers see the old rows or the new rows, never a blend               │
//! │                                                                         │
//! │  Last received snapshot wins. No merge, no conflict resolution.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atelier_core::Product;

/// Row mapping for the products table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    sku: String,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    price_cents: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            sku: row.sku,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            price_cents: row.price_cents,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let products = repo.list_active(50).await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products sorted by name.
    pub async fn list_active(&self, limit: i64) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, sku, name, description, image_url,
                   price_cents, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, sku, name, description, image_url,
                   price_cents, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Inserts or updates a product.
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Upserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description, image_url,
                price_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                sku = excluded.sku,
                name = excluded.name,
                description = excluded.description,
                image_url = excluded.image_url,
                price_cents = excluded.price_cents,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.price_cents)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces the entire catalog with a new snapshot.
    ///
    /// One transaction: delete everything, insert the snapshot. Readers
    /// observe either the previous catalog or the new one.
    pub async fn replace_all(&self, products: &[Product]) -> DbResult<()> {
        debug!(count = products.len(), "Replacing product catalog");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;

        for product in products {
            sqlx::query(
                r#"
                INSERT INTO products (
                    id, sku, name, description, image_url,
                    price_cents, is_active, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&product.id)
            .bind(&product.sku)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(product.price_cents)
            .bind(product.is_active)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// - Carts may still reference this product
    /// - Can be restored if deleted by mistake
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            description: Some("A fine product".to_string()),
            image_url: None,
            price_cents,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = test_product("p1", 2500);
        repo.upsert(&product).await.unwrap();

        let fetched = repo.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(fetched.sku, "SKU-p1");
        assert_eq!(fetched.price_cents, 2500);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_all_swaps_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.upsert(&test_product("old", 1000)).await.unwrap();

        // New snapshot does not contain "old"
        let snapshot = vec![test_product("a", 100), test_product("b", 200)];
        repo.replace_all(&snapshot).await.unwrap();

        assert!(repo.get_by_id("old").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.upsert(&test_product("p1", 2500)).await.unwrap();
        repo.soft_delete("p1").await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        // Still fetchable by ID (soft delete, not erasure)
        let product = repo.get_by_id("p1").await.unwrap().unwrap();
        assert!(!product.is_active);

        assert!(matches!(
            repo.soft_delete("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
