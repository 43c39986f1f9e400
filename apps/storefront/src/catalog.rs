//! # Catalog Cache
//!
//! Read-side cache of the product catalog with replace-on-notify
//! semantics.
//!
//! ## Replace on Notify
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Refresh                                      │
//! │                                                                         │
//! │  Catalog changes land in the products table                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Refresh task wakes (interval)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  list_active() → full snapshot                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  replace_all(snapshot) ← atomic swap under the RwLock                  │
//! │                                                                         │
//! │  The last received snapshot wins. No merge, no conflict resolution:    │
//! │  readers observe either the previous snapshot or the new one.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use atelier_core::Product;
use atelier_db::Database;

/// Upper bound on catalog snapshot size.
const SNAPSHOT_LIMIT: i64 = 10_000;

/// In-memory product cache keyed by product ID.
#[derive(Debug, Default)]
pub struct CatalogCache {
    products: RwLock<HashMap<String, Product>>,
}

impl CatalogCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a product by ID.
    pub fn get(&self, id: &str) -> Option<Product> {
        self.products
            .read()
            .expect("catalog cache poisoned")
            .get(id)
            .cloned()
    }

    /// Lists all cached products, sorted by name.
    pub fn list(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .expect("catalog cache poisoned")
            .values()
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    /// Number of cached products.
    pub fn len(&self) -> usize {
        self.products.read().expect("catalog cache poisoned").len()
    }

    /// True if the cache holds no products.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically replaces the cache contents with a full snapshot.
    ///
    /// Products absent from the snapshot disappear; there is no merge.
    pub fn replace_all(&self, snapshot: Vec<Product>) {
        let next: HashMap<String, Product> = snapshot
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let mut products = self.products.write().expect("catalog cache poisoned");
        *products = next;

        debug!(count = products.len(), "Catalog snapshot applied");
    }
}

/// Loads the current catalog into the cache once.
///
/// Called at startup so the storefront serves products before the
/// first refresh tick.
pub async fn prime(cache: &CatalogCache, db: &Database) {
    match db.products().list_active(SNAPSHOT_LIMIT).await {
        Ok(snapshot) => cache.replace_all(snapshot),
        Err(e) => warn!(error = %e, "Failed to prime catalog cache"),
    }
}

/// Spawns the background refresh task.
///
/// Each tick fetches a full snapshot and swaps it in. Fetch failures
/// keep the previous snapshot; the next tick tries again.
pub fn spawn_refresh_task(
    cache: Arc<CatalogCache>,
    db: Database,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The immediate first tick duplicates prime(); skip it
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match db.products().list_active(SNAPSHOT_LIMIT).await {
                Ok(snapshot) => cache.replace_all(snapshot),
                Err(e) => warn!(error = %e, "Catalog refresh failed, keeping previous snapshot"),
            }
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: name.to_string(),
            description: None,
            image_url: None,
            price_cents: 1000,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_replace_all_swaps_fully() {
        let cache = CatalogCache::new();
        cache.replace_all(vec![test_product("old", "Old Product")]);
        assert!(cache.get("old").is_some());

        // The new snapshot does not contain "old": last snapshot wins
        cache.replace_all(vec![test_product("a", "A"), test_product("b", "B")]);

        assert!(cache.get("old").is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_list_sorted_by_name() {
        let cache = CatalogCache::new();
        cache.replace_all(vec![
            test_product("1", "Zinnia Seeds"),
            test_product("2", "Amber Candle"),
        ]);

        let names: Vec<String> = cache.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Amber Candle", "Zinnia Seeds"]);
    }

    #[tokio::test]
    async fn test_prime_from_database() {
        let db = atelier_db::Database::new(atelier_db::DbConfig::in_memory())
            .await
            .unwrap();
        db.products()
            .upsert(&test_product("p1", "Candle"))
            .await
            .unwrap();

        let cache = CatalogCache::new();
        prime(&cache, &db).await;

        assert_eq!(cache.len(), 1);
        assert!(cache.get("p1").is_some());
    }
}
