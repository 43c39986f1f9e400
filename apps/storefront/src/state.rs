//! Shared application state for the storefront.

use std::sync::Arc;

use crate::carts::{CartRegistry, CheckoutGuard};
use crate::catalog::CatalogCache;
use crate::config::StorefrontConfig;
use atelier_db::Database;
use atelier_payments::SessionCreator;

/// State shared across all route handlers.
///
/// Everything is cheap to clone: the database holds a pool handle, and
/// the rest are Arcs.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub carts: Arc<CartRegistry>,
    pub catalog: Arc<CatalogCache>,
    pub payments: Arc<dyn SessionCreator>,
    pub checkout_guard: Arc<CheckoutGuard>,
    pub config: Arc<StorefrontConfig>,
}

impl AppState {
    /// Assembles the application state.
    pub fn new(
        db: Database,
        catalog: Arc<CatalogCache>,
        payments: Arc<dyn SessionCreator>,
        config: StorefrontConfig,
    ) -> Self {
        AppState {
            db,
            carts: Arc::new(CartRegistry::new()),
            catalog,
            payments,
            checkout_guard: Arc::new(CheckoutGuard::new()),
            config: Arc::new(config),
        }
    }
}
