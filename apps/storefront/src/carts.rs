//! # Cart Registry
//!
//! Per-session cart state for the storefront.
//!
//! ## Thread Safety
//! The registry is wrapped in a `Mutex` because:
//! 1. Multiple handlers may access/modify carts concurrently
//! 2. Only one handler should modify a cart at a time
//! 3. Cart operations are quick; a single lock is simpler than
//!    per-session locks and contention is negligible at storefront scale
//!
//! ## Session Scoping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Registry                                        │
//! │                                                                         │
//! │  session "a1b2..." ──► Cart { items, promo }                           │
//! │  session "c3d4..." ──► Cart { items, promo }                           │
//! │                                                                         │
//! │  Each cart is scoped to one browser session/client. There is no        │
//! │  shared mutable cart state across sessions.                            │
//! │                                                                         │
//! │  First access for a session restores the persisted snapshot, if       │
//! │  one exists; every mutation persists a fresh snapshot.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tracing::{debug, warn};

use atelier_core::{Cart, CartSnapshot};
use atelier_db::Database;

/// Session-keyed cart storage.
#[derive(Debug, Default)]
pub struct CartRegistry {
    carts: Mutex<HashMap<String, Cart>>,
}

impl CartRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether a session already has an in-memory cart.
    pub fn contains(&self, session_id: &str) -> bool {
        self.carts.lock().expect("cart registry poisoned").contains_key(session_id)
    }

    /// Installs a restored cart for a session, unless one already exists.
    ///
    /// Keeps the live cart authoritative when a restore races a
    /// concurrent mutation.
    pub fn install(&self, session_id: &str, cart: Cart) {
        let mut carts = self.carts.lock().expect("cart registry poisoned");
        carts.entry(session_id.to_string()).or_insert(cart);
    }

    /// Executes a function with read access to a session's cart.
    ///
    /// Creates an empty cart for unknown sessions.
    pub fn with_cart<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let mut carts = self.carts.lock().expect("cart registry poisoned");
        let cart = carts.entry(session_id.to_string()).or_insert_with(Cart::new);
        f(cart)
    }

    /// Executes a function with write access to a session's cart and
    /// returns the result alongside a snapshot for persistence.
    ///
    /// The snapshot is captured inside the lock so it reflects exactly
    /// the state the mutation produced; persistence happens outside.
    pub fn with_cart_mut<F, R>(&self, session_id: &str, f: F) -> (R, CartSnapshot)
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut carts = self.carts.lock().expect("cart registry poisoned");
        let cart = carts.entry(session_id.to_string()).or_insert_with(Cart::new);
        let result = f(cart);
        (result, cart.snapshot())
    }
}

/// Restores a session's cart from its persisted snapshot on first access.
///
/// Snapshot load failures are logged and ignored: persistence is a
/// convenience, and a fresh cart is the correct fallback.
pub async fn ensure_restored(registry: &CartRegistry, db: &Database, session_id: &str) {
    if registry.contains(session_id) {
        return;
    }

    match db.cart_snapshots().load(session_id).await {
        Ok(Some(snapshot)) => {
            debug!(session_id = %session_id, items = snapshot.items.len(), "Restoring cart snapshot");
            registry.install(session_id, Cart::from_snapshot(snapshot));
        }
        Ok(None) => {}
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Failed to restore cart snapshot");
        }
    }
}

/// Persists a cart snapshot after a mutation.
///
/// Failures are logged, not surfaced: the in-memory cart is the
/// authority while the session is live.
pub async fn persist_snapshot(db: &Database, session_id: &str, snapshot: &CartSnapshot) {
    if let Err(e) = db.cart_snapshots().save(session_id, snapshot).await {
        warn!(session_id = %session_id, error = %e, "Failed to persist cart snapshot");
    }
}

// =============================================================================
// Checkout Guard
// =============================================================================

/// Tracks sessions with a checkout submission in flight.
///
/// The backend analog of disabling the submit button: a second
/// submission for the same session is rejected until the first
/// resolves terminally (success or failure).
#[derive(Debug, Default)]
pub struct CheckoutGuard {
    pending: Mutex<HashSet<String>>,
}

impl CheckoutGuard {
    /// Creates an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a session's checkout as in flight.
    ///
    /// ## Returns
    /// * `Some(InFlight)` - proceed; the marker clears when dropped
    /// * `None` - a checkout for this session is already in flight
    pub fn begin<'a>(&'a self, session_id: &str) -> Option<InFlight<'a>> {
        let mut pending = self.pending.lock().expect("checkout guard poisoned");
        if !pending.insert(session_id.to_string()) {
            return None;
        }
        Some(InFlight {
            guard: self,
            session_id: session_id.to_string(),
        })
    }

    fn end(&self, session_id: &str) {
        self.pending
            .lock()
            .expect("checkout guard poisoned")
            .remove(session_id);
    }
}

/// Marker for an in-flight checkout; clears the pending flag on drop,
/// whether the checkout succeeded, failed, or panicked.
#[derive(Debug)]
pub struct InFlight<'a> {
    guard: &'a CheckoutGuard,
    session_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.end(&self.session_id);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
