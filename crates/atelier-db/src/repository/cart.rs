//! # Cart Snapshot Repository
//!
//! Durable cart persistence, one JSON payload per client session.
//!
//! The snapshot is incidental convenience (carts survive page reloads),
//! not a correctness-critical subsystem: the in-memory cart is the
//! authority while a session is live, and the snapshot is overwritten
//! whole on every mutation.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use atelier_core::CartSnapshot;

/// Repository for cart snapshot persistence.
#[derive(Debug, Clone)]
pub struct CartSnapshotRepository {
    pool: SqlitePool,
}

impl CartSnapshotRepository {
    /// Creates a new CartSnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartSnapshotRepository { pool }
    }

    /// Loads the snapshot for a session, if one was persisted.
    pub async fn load(&self, session_id: &str) -> DbResult<Option<CartSnapshot>> {
        let payload: Option<String> = sqlx::query_scalar(
            "SELECT payload FROM cart_snapshots WHERE session_id = ?1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        match payload {
            Some(json) => {
                let snapshot: CartSnapshot = serde_json::from_str(&json)?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Saves (overwrites) the snapshot for a session.
    pub async fn save(&self, session_id: &str, snapshot: &CartSnapshot) -> DbResult<()> {
        debug!(session_id = %session_id, items = snapshot.items.len(), "Persisting cart snapshot");

        let payload = serde_json::to_string(snapshot)?;

        sqlx::query(
            r#"
            INSERT INTO cart_snapshots (session_id, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(session_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session_id)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the snapshot for a session. No-op if absent.
    pub async fn delete(&self, session_id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM cart_snapshots WHERE session_id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

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
    use atelier_core::types::{Discount, Product, PromoCode};
    use atelier_core::Cart;

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

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cart_snapshots();

        let mut cart = Cart::new();
        cart.add_item(&test_product("p1", 2500), 2);
        cart.apply_promo(PromoCode {
            code: "SUMMER10".to_string(),
            discount: Discount::Percentage { bps: 1000 },
            expires_at: None,
        });

        repo.save("session-1", &cart.snapshot()).await.unwrap();

        let loaded = repo.load("session-1").await.unwrap().unwrap();
        let restored = Cart::from_snapshot(loaded);
        assert_eq!(restored.items, cart.items);
        assert_eq!(restored.promo, cart.promo);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cart_snapshots();

        let mut cart = Cart::new();
        cart.add_item(&test_product("p1", 2500), 1);
        repo.save("s", &cart.snapshot()).await.unwrap();

        cart.add_item(&test_product("p2", 1000), 1);
        repo.save("s", &cart.snapshot()).await.unwrap();

        let loaded = repo.load("s").await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cart_snapshots();

        assert!(repo.load("missing").await.unwrap().is_none());

        let cart = Cart::new();
        repo.save("s", &cart.snapshot()).await.unwrap();
        repo.delete("s").await.unwrap();
        assert!(repo.load("s").await.unwrap().is_none());

        // Deleting again is a no-op
        repo.delete("s").await.unwrap();
    }
}
