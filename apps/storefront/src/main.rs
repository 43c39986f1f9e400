//! # Atelier Storefront
//!
//! HTTP API for the cart, pricing and checkout core.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Server                                │
//! │                                                                         │
//! │  Frontend ───► HTTP (8080) ───► Handlers ───► atelier-core            │
//! │                                     │              atelier-db          │
//! │                                     ▼              atelier-payments    │
//! │                               Stripe hosted                             │
//! │                               checkout page                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod carts;
mod catalog;
mod config;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogCache;
use crate::config::StorefrontConfig;
use crate::state::AppState;
use atelier_db::{Database, DbConfig};
use atelier_payments::{SessionCreator, StripeCheckout, UnconfiguredSessionCreator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Atelier storefront...");

    // Load configuration
    let config = StorefrontConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    // Prime the catalog cache and start the refresh loop
    let catalog = Arc::new(CatalogCache::new());
    catalog::prime(&catalog, &db).await;
    info!(products = catalog.len(), "Catalog cache primed");

    let _refresh_task = catalog::spawn_refresh_task(
        catalog.clone(),
        db.clone(),
        Duration::from_secs(config.catalog_refresh_secs),
    );

    // Payment session creator: Stripe when configured, otherwise a stub
    // that surfaces the missing configuration at checkout time
    let payments: Arc<dyn SessionCreator> = match config.stripe_secret_key {
        Some(ref key) => {
            info!("Stripe checkout configured");
            Arc::new(StripeCheckout::new(
                key,
                config.checkout_success_url.clone(),
                config.checkout_cancel_url.clone(),
            ))
        }
        None => {
            warn!("STRIPE_SECRET_KEY not set; checkout will fail until configured");
            Arc::new(UnconfiguredSessionCreator)
        }
    };

    let state = AppState::new(db, catalog, payments, config.clone());

    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the route table.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/{product_id}", get(handlers::catalog::get_product))
        .route("/cart/{session_id}", get(handlers::cart::get_cart))
        .route("/cart/{session_id}", delete(handlers::cart::clear_cart))
        .route("/cart/{session_id}/items", post(handlers::cart::add_to_cart))
        .route(
            "/cart/{session_id}/items/{product_id}",
            put(handlers::cart::update_cart_item),
        )
        .route(
            "/cart/{session_id}/items/{product_id}",
            delete(handlers::cart::remove_from_cart),
        )
        .route("/cart/{session_id}/promo", post(handlers::cart::apply_promo))
        .route(
            "/cart/{session_id}/promo",
            delete(handlers::cart::remove_promo),
        )
        .route(
            "/checkout/{session_id}",
            post(handlers::checkout::submit_checkout),
        )
        .route("/shipping/{country}", get(handlers::rates::shipping_options))
        .route("/tax/{region}", get(handlers::rates::tax_config))
        .with_state(state)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
