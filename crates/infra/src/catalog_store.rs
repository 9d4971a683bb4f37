//! Catalog storage abstraction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use carrito_catalog::Product;
use carrito_core::{DomainError, DomainResult, ProductId};

/// Read-mostly store of purchasable products.
///
/// The engine consumes this as an external collaborator: lookups during
/// validation, and in-place stock decrements during the pay commit phase.
pub trait CatalogStore: Send + Sync {
    fn find(&self, id: ProductId) -> Option<Product>;
    fn list(&self) -> Vec<Product>;
    /// Insert or overwrite a product (catalog management path).
    fn insert(&self, product: Product);
    /// Decrement a product's stock. Callers are expected to have validated
    /// sufficiency; the store still refuses underflow rather than wrapping.
    fn decrement_stock(&self, id: ProductId, quantity: u32) -> DomainResult<()>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn find(&self, id: ProductId) -> Option<Product> {
        (**self).find(id)
    }

    fn list(&self) -> Vec<Product> {
        (**self).list()
    }

    fn insert(&self, product: Product) {
        (**self).insert(product)
    }

    fn decrement_stock(&self, id: ProductId, quantity: u32) -> DomainResult<()> {
        (**self).decrement_stock(id, quantity)
    }
}

/// In-memory catalog store.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Remove a product entirely. Catalog management is external to the
    /// engine, which never deletes products itself; live carts referencing
    /// a removed product surface it as not-found at pay time.
    pub fn remove(&self, id: ProductId) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(&id).is_some(),
            Err(_) => false,
        }
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn find(&self, id: ProductId) -> Option<Product> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn list(&self) -> Vec<Product> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut products: Vec<Product> = map.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        products
    }

    fn insert(&self, product: Product) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(product.id, product);
        }
    }

    fn decrement_stock(&self, id: ProductId, quantity: u32) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::not_found())?;
        let product = map.get(&id).ok_or(DomainError::NotFound)?;
        let updated = product.with_stock_decremented(quantity)?;
        map.insert(id, updated);
        Ok(())
    }
}
