//! # atelier-payments: Payment Session Boundary
//!
//! This crate owns the handoff from an assembled order to the payment
//! processor's hosted checkout page.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Payment Boundary                                    │
//! │                                                                         │
//! │  Storefront checkout handler                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                atelier-payments (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   SessionCreator (trait) ◄── StripeCheckout (async-stripe)     │   │
//! │  │                          ◄── MockSessionCreator (tests)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { id, url } → customer is redirected to the hosted payment page      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures are surfaced verbatim and never retried here; the cart
//! stays intact for the customer to resubmit.

pub mod error;
pub mod session;
pub mod stripe;

pub use error::{PaymentError, PaymentResult};
pub use session::{
    HostedSession, MockSessionCreator, SessionCreator, SessionRequest, UnconfiguredSessionCreator,
};
pub use stripe::StripeCheckout;
