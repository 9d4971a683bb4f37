//! Cart storage abstraction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use carrito_cart::Cart;
use carrito_core::{CartId, UserId};

/// Store of active carts, addressable by cart id and by owning user.
///
/// A cart is owned exclusively by this store while active; removal (delete,
/// pay, expiry) is terminal. The one-cart-per-user invariant is the
/// engine's to enforce; the store only keeps the secondary index coherent.
pub trait CartStore: Send + Sync {
    fn find_by_id(&self, id: CartId) -> Option<Cart>;
    fn find_by_user(&self, user_id: &UserId) -> Option<Cart>;
    fn list(&self) -> Vec<Cart>;
    /// Insert a new cart or overwrite an existing one (same id).
    fn insert(&self, cart: Cart);
    /// Remove a cart. Returns whether anything was removed.
    fn remove(&self, id: CartId) -> bool;
}

impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    fn find_by_id(&self, id: CartId) -> Option<Cart> {
        (**self).find_by_id(id)
    }

    fn find_by_user(&self, user_id: &UserId) -> Option<Cart> {
        (**self).find_by_user(user_id)
    }

    fn list(&self) -> Vec<Cart> {
        (**self).list()
    }

    fn insert(&self, cart: Cart) {
        (**self).insert(cart)
    }

    fn remove(&self, id: CartId) -> bool {
        (**self).remove(id)
    }
}

#[derive(Debug, Default)]
struct CartIndex {
    by_id: HashMap<CartId, Cart>,
    /// Secondary index for the one-cart-per-user lookup.
    by_user: HashMap<UserId, CartId>,
}

/// In-memory cart store with a user index.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    inner: RwLock<CartIndex>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CartIndex::default()),
        }
    }
}

impl CartStore for InMemoryCartStore {
    fn find_by_id(&self, id: CartId) -> Option<Cart> {
        let index = self.inner.read().ok()?;
        index.by_id.get(&id).cloned()
    }

    fn find_by_user(&self, user_id: &UserId) -> Option<Cart> {
        let index = self.inner.read().ok()?;
        let cart_id = index.by_user.get(user_id)?;
        index.by_id.get(cart_id).cloned()
    }

    fn list(&self) -> Vec<Cart> {
        let index = match self.inner.read() {
            Ok(i) => i,
            Err(_) => return vec![],
        };

        let mut carts: Vec<Cart> = index.by_id.values().cloned().collect();
        // Cart ids are UUIDv7, so this is creation order.
        carts.sort_by_key(|c| *c.id.as_uuid());
        carts
    }

    fn insert(&self, cart: Cart) {
        if let Ok(mut index) = self.inner.write() {
            index.by_user.insert(cart.user_id.clone(), cart.id);
            index.by_id.insert(cart.id, cart);
        }
    }

    fn remove(&self, id: CartId) -> bool {
        let Ok(mut index) = self.inner.write() else {
            return false;
        };

        match index.by_id.remove(&id) {
            Some(cart) => {
                // Only drop the user mapping if it still points at this cart.
                if index.by_user.get(&cart.user_id) == Some(&id) {
                    index.by_user.remove(&cart.user_id);
                }
                true
            }
            None => false,
        }
    }
}
