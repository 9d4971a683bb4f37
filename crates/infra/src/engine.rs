//! Cart engine: the cart lifecycle and stock-reservation state machine.
//!
//! Every operation here is a short, synchronous unit of work with
//! all-or-nothing semantics: validation fully precedes mutation, so no
//! partial state is ever left visible. A cart moves Active → Expired
//! (derived lazily on access) → Removed (terminal, via delete or pay).

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carrito_cart::{Cart, CartItem, CartLimits};
use carrito_core::{CartId, DomainError, DomainResult, UserId};

use crate::cart_store::CartStore;
use crate::catalog_store::CatalogStore;

/// Literal prefix of every tracking number handed out by `pay`.
pub const TRACKING_PREFIX: &str = "PEDIDO-";

/// Result of a successful pay transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// `PEDIDO-` + 8 uppercase hex chars from a fresh random UUID.
    /// Uniqueness is best-effort, inherited from the UUID.
    pub tracking_number: String,
}

/// Orchestrates cart operations over the cart and catalog stores.
///
/// The stores lock internally per call; the engine additionally serializes
/// each compound operation under one exclusive mutex so check-then-act
/// sequences (one-cart-per-user, stock check-then-decrement) never observe
/// interleaved writes. Two concurrent pays racing on the same product
/// cannot both succeed when their combined quantities exceed stock.
pub struct CartEngine {
    carts: Arc<dyn CartStore>,
    catalog: Arc<dyn CatalogStore>,
    limits: CartLimits,
    gate: Mutex<()>,
}

impl CartEngine {
    pub fn new(
        carts: Arc<dyn CartStore>,
        catalog: Arc<dyn CatalogStore>,
        limits: CartLimits,
    ) -> Self {
        Self {
            carts,
            catalog,
            limits,
            gate: Mutex::new(()),
        }
    }

    pub fn limits(&self) -> &CartLimits {
        &self.limits
    }

    /// Open a new cart for `user_id`.
    ///
    /// An expired leftover cart for the same user is purged first (lazy
    /// expiry triggers on this access); a still-active one is a conflict.
    pub fn create_cart(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<Cart> {
        let _guard = self.gate.lock().unwrap();

        if let Some(existing) = self.carts.find_by_user(&user_id) {
            if existing.is_expired(now, self.limits.inactivity_timeout) {
                self.carts.remove(existing.id);
                tracing::info!(cart_id = %existing.id, user_id = %user_id, "expired cart purged");
            } else {
                return Err(DomainError::conflict(format!(
                    "user {user_id} already has an active cart"
                )));
            }
        }

        let cart = Cart::new(CartId::new(), user_id, now);
        self.carts.insert(cart.clone());
        tracing::info!(cart_id = %cart.id, user_id = %cart.user_id, "cart created");
        Ok(cart)
    }

    /// Fetch a cart without touching `updated_at`.
    pub fn get_cart(&self, cart_id: CartId, now: DateTime<Utc>) -> DomainResult<Cart> {
        let _guard = self.gate.lock().unwrap();
        self.load_live(cart_id, now)
    }

    /// All active carts. Expired carts encountered are removed and omitted.
    pub fn list_carts(&self, now: DateTime<Utc>) -> Vec<Cart> {
        let _guard = self.gate.lock().unwrap();

        let mut live = Vec::new();
        for cart in self.carts.list() {
            if cart.is_expired(now, self.limits.inactivity_timeout) {
                self.carts.remove(cart.id);
                tracing::info!(cart_id = %cart.id, "expired cart purged");
            } else {
                live.push(cart);
            }
        }
        live
    }

    /// Remove a cart unconditionally. No expiry check: deletion of an
    /// expired cart and deletion of an active one end the same way.
    pub fn delete_cart(&self, cart_id: CartId) -> DomainResult<()> {
        let _guard = self.gate.lock().unwrap();

        if !self.carts.remove(cart_id) {
            return Err(DomainError::NotFound);
        }
        tracing::info!(cart_id = %cart_id, "cart deleted");
        Ok(())
    }

    /// Replace the cart's item collection wholesale.
    ///
    /// Entries are validated as given, one by one, against the catalog:
    /// unknown product → not-found, quantity over current stock → conflict.
    /// Duplicate product ids in the request are not merged beforehand.
    pub fn replace_items(
        &self,
        cart_id: CartId,
        new_items: Vec<CartItem>,
        now: DateTime<Utc>,
    ) -> DomainResult<Cart> {
        let _guard = self.gate.lock().unwrap();
        let cart = self.load_live(cart_id, now)?;

        for item in &new_items {
            let product = self
                .catalog
                .find(item.product_id)
                .ok_or(DomainError::NotFound)?;
            product.ensure_stock(item.quantity)?;
        }

        let updated = cart.with_items_replaced(new_items, &self.limits, now)?;
        self.carts.insert(updated.clone());
        tracing::debug!(cart_id = %cart_id, items = updated.items.len(), "cart items replaced");
        Ok(updated)
    }

    /// Merge items into the cart, accumulating quantities per product.
    ///
    /// Validation is fully evaluated before any mutation: unknown products,
    /// the 15-unit grand total cap, and the 10-unit per-product cap all
    /// reject the request with the cart unchanged.
    pub fn add_items(
        &self,
        cart_id: CartId,
        incoming: Vec<CartItem>,
        now: DateTime<Utc>,
    ) -> DomainResult<Cart> {
        let _guard = self.gate.lock().unwrap();
        let cart = self.load_live(cart_id, now)?;

        for item in &incoming {
            if self.catalog.find(item.product_id).is_none() {
                return Err(DomainError::NotFound);
            }
        }

        let updated = cart.with_items_merged(&incoming, &self.limits, now)?;
        self.carts.insert(updated.clone());
        tracing::debug!(cart_id = %cart_id, items = updated.items.len(), "cart items added");
        Ok(updated)
    }

    /// Pay the cart: validate every line against current stock, then commit
    /// by decrementing stock in the same order, and retire the cart.
    pub fn pay(&self, cart_id: CartId, now: DateTime<Utc>) -> DomainResult<Receipt> {
        let _guard = self.gate.lock().unwrap();
        let cart = self.load_live(cart_id, now)?;

        if cart.is_empty() {
            return Err(DomainError::bad_request("cart is empty"));
        }

        // Phase 1: validate. Touches no mutable state. A product that
        // vanished since being added surfaces as not-found.
        for item in &cart.items {
            let product = self
                .catalog
                .find(item.product_id)
                .ok_or(DomainError::NotFound)?;
            product.ensure_stock(item.quantity)?;
        }

        // Phase 2: commit. Phase 1 guarantees sufficiency and the gate
        // keeps other operations out, so these decrements cannot fail.
        for item in &cart.items {
            self.catalog.decrement_stock(item.product_id, item.quantity)?;
        }
        self.carts.remove(cart.id);

        let receipt = Receipt {
            tracking_number: new_tracking_number(),
        };
        tracing::info!(
            cart_id = %cart.id,
            user_id = %cart.user_id,
            tracking_number = %receipt.tracking_number,
            "cart paid"
        );
        Ok(receipt)
    }

    /// Look up a cart, applying lazy expiry: an expired cart is removed
    /// here and reported as gone instead of being returned.
    fn load_live(&self, cart_id: CartId, now: DateTime<Utc>) -> DomainResult<Cart> {
        let cart = self.carts.find_by_id(cart_id).ok_or(DomainError::NotFound)?;
        if cart.is_expired(now, self.limits.inactivity_timeout) {
            self.carts.remove(cart.id);
            tracing::info!(cart_id = %cart.id, user_id = %cart.user_id, "expired cart purged");
            return Err(DomainError::Gone);
        }
        Ok(cart)
    }
}

fn new_tracking_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{TRACKING_PREFIX}{}", id[..8].to_uppercase())
}
