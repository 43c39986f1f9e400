//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Storefront configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Stripe secret key; checkout fails with a configuration error
    /// until this is set
    pub stripe_secret_key: Option<String>,

    /// Redirect target after successful payment
    pub checkout_success_url: String,

    /// Redirect target when checkout is cancelled
    pub checkout_cancel_url: String,

    /// Seconds between catalog snapshot refreshes
    pub catalog_refresh_secs: u64,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Environment Variables
    /// - `ATELIER_HTTP_PORT` (default: 8080)
    /// - `ATELIER_DB_PATH` (default: ./atelier.db)
    /// - `STRIPE_SECRET_KEY` (optional; checkout errors until set)
    /// - `CHECKOUT_SUCCESS_URL` / `CHECKOUT_CANCEL_URL`
    /// - `ATELIER_CATALOG_REFRESH_SECS` (default: 30)
    pub fn load() -> Result<Self, ConfigError> {
        let config = StorefrontConfig {
            http_port: env::var("ATELIER_HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ATELIER_HTTP_PORT".to_string()))?,

            database_path: env::var("ATELIER_DB_PATH")
                .unwrap_or_else(|_| "./atelier.db".to_string()),

            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),

            checkout_success_url: env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:3000/checkout/success".to_string()),

            checkout_cancel_url: env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/checkout/cancelled".to_string()),

            catalog_refresh_secs: env::var("ATELIER_CATALOG_REFRESH_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("ATELIER_CATALOG_REFRESH_SECS".to_string())
                })?,
        };

        if config.catalog_refresh_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "ATELIER_CATALOG_REFRESH_SECS".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
