//! # Route Handlers
//!
//! One module per route family:
//! - [`cart`] - Cart mutations and reads, promo apply/remove
//! - [`checkout`] - Checkout submission
//! - [`catalog`] - Product listing from the read-cache
//! - [`rates`] - Shipping options and tax configuration lookups
//! - [`health`] - Liveness/readiness probe

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod rates;
