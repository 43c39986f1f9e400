//! Payment error types.

use thiserror::Error;

/// Errors from the payment session boundary.
///
/// Session creation failures are surfaced to the caller verbatim and
/// never retried automatically; the cart stays intact so the customer
/// can resubmit.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Missing or invalid payment configuration.
    ///
    /// ## When This Occurs
    /// - `STRIPE_SECRET_KEY` not set
    /// - Malformed redirect URLs
    #[error("Payment configuration error: {0}")]
    Config(String),

    /// The order cannot be turned into a session.
    #[error("Invalid session request: {0}")]
    InvalidRequest(String),

    /// The payment processor rejected or failed the request.
    #[error("Payment processor error: {0}")]
    Processor(String),
}

/// Result type for payment operations.
pub type PaymentResult<T> = Result<T, PaymentError>;
