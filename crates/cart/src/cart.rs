use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use carrito_core::{CartId, DomainError, DomainResult, ProductId, UserId};

use crate::limits::CartLimits;

/// One product line in a cart.
///
/// A cart holds at most one item per product; repeated additions of the same
/// product accumulate into a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    /// Units of the product. Always >= 1 inside a stored cart.
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A user's in-progress, uncommitted selection of products.
///
/// Lifecycle: created (one per user at a time), mutated by add/replace,
/// destroyed by delete, successful pay, or lazy expiry on access. Items keep
/// insertion order and are unique by product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// A fresh, empty cart.
    pub fn new(id: CartId, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of all item quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Quantity of a single product in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart has been inactive for longer than the threshold.
    ///
    /// Strictly greater-than: a cart exactly at the threshold is still live.
    pub fn is_expired(&self, now: DateTime<Utc>, inactivity_timeout: Duration) -> bool {
        now - self.updated_at > inactivity_timeout
    }

    /// Pure transition: merge `incoming` items into this cart.
    ///
    /// Per distinct product, the prospective quantity is the existing
    /// quantity plus the sum of all incoming quantities for that product
    /// across the whole request. Validation fully precedes mutation: on any
    /// failure the returned error carries no partial state and `self` is
    /// untouched.
    pub fn with_items_merged(
        &self,
        incoming: &[CartItem],
        limits: &CartLimits,
        now: DateTime<Utc>,
    ) -> DomainResult<Cart> {
        ensure_positive_quantities(incoming)?;

        // Prospective per-product totals, in first-seen order. u64 keeps the
        // arithmetic safe against hostile quantities near u32::MAX.
        let mut prospective: Vec<(ProductId, u64)> = self
            .items
            .iter()
            .map(|i| (i.product_id, u64::from(i.quantity)))
            .collect();
        for item in incoming {
            match prospective.iter_mut().find(|(p, _)| *p == item.product_id) {
                Some((_, qty)) => *qty += u64::from(item.quantity),
                None => prospective.push((item.product_id, u64::from(item.quantity))),
            }
        }

        let grand_total: u64 = prospective.iter().map(|(_, q)| *q).sum();
        if grand_total > u64::from(limits.max_total_quantity) {
            return Err(DomainError::bad_request(format!(
                "too many items: cart would hold {grand_total} units, limit is {}",
                limits.max_total_quantity
            )));
        }
        if let Some((product_id, qty)) = prospective
            .iter()
            .find(|(_, q)| *q > u64::from(limits.max_per_product))
        {
            return Err(DomainError::bad_request(format!(
                "too many units of one product: {qty} of product {product_id}, limit is {}",
                limits.max_per_product
            )));
        }

        // Validation passed; totals fit in u32 by the per-product cap.
        let items = prospective
            .into_iter()
            .map(|(product_id, qty)| CartItem::new(product_id, qty as u32))
            .collect();

        Ok(Cart {
            items,
            updated_at: now,
            ..self.clone()
        })
    }

    /// Pure transition: replace the item collection wholesale.
    ///
    /// Entries are taken as given, in the given order. Duplicate product ids
    /// in `new_items` are deliberately not merged; stock validation against
    /// the catalog is the caller's job and happens entry-by-entry on the
    /// same as-given view.
    pub fn with_items_replaced(
        &self,
        new_items: Vec<CartItem>,
        limits: &CartLimits,
        now: DateTime<Utc>,
    ) -> DomainResult<Cart> {
        ensure_positive_quantities(&new_items)?;

        let total: u64 = new_items.iter().map(|i| u64::from(i.quantity)).sum();
        if total > u64::from(limits.max_total_quantity) {
            return Err(DomainError::bad_request(format!(
                "too many items: cart would hold {total} units, limit is {}",
                limits.max_total_quantity
            )));
        }
        if let Some(item) = new_items
            .iter()
            .find(|i| i.quantity > limits.max_per_product)
        {
            return Err(DomainError::bad_request(format!(
                "too many units of one product: {} of product {}, limit is {}",
                item.quantity, item.product_id, limits.max_per_product
            )));
        }

        Ok(Cart {
            items: new_items,
            updated_at: now,
            ..self.clone()
        })
    }
}

fn ensure_positive_quantities(items: &[CartItem]) -> DomainResult<()> {
    if let Some(item) = items.iter().find(|i| i.quantity == 0) {
        return Err(DomainError::bad_request(format!(
            "quantity for product {} must be at least 1",
            item.product_id
        )));
    }
    Ok(())
}
