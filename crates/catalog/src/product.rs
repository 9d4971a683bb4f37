use serde::{Deserialize, Serialize};

use carrito_core::{DomainError, DomainResult, ProductId};

/// Catalog product with finite stock.
///
/// Owned by the catalog store. The cart engine never deletes products; it
/// only decrements `stock` during the pay transaction. Catalog management
/// (creation, price changes) happens through the gateway's product routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price_cents: u64,
    /// Units currently available. Never goes negative.
    pub stock: u32,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        unit_price_cents: u64,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price_cents,
            stock,
        }
    }

    /// Check that `quantity` units could be taken from current stock.
    pub fn ensure_stock(&self, quantity: u32) -> DomainResult<()> {
        if quantity > self.stock {
            return Err(DomainError::conflict(format!(
                "insufficient stock for product {}: requested {}, available {}",
                self.id, quantity, self.stock
            )));
        }
        Ok(())
    }

    /// Pure transition: the same product with `quantity` units removed from
    /// stock, or a conflict if stock is insufficient.
    pub fn with_stock_decremented(&self, quantity: u32) -> DomainResult<Product> {
        self.ensure_stock(quantity)?;
        Ok(Product {
            stock: self.stock - quantity,
            ..self.clone()
        })
    }
}
