use serde::Deserialize;

use carrito_cart::CartItem;
use carrito_catalog::Product;
use carrito_core::ProductId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCartRequest {
    pub user_id: String,
}

/// One item entry in a PUT/PATCH body.
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub product_id: i64,
    pub quantity: u32,
}

impl CartItemRequest {
    pub fn into_item(self) -> CartItem {
        CartItem::new(ProductId::new(self.product_id), self.quantity)
    }
}

pub fn into_items(entries: Vec<CartItemRequest>) -> Vec<CartItem> {
    entries.into_iter().map(CartItemRequest::into_item).collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub id: i64,
    pub name: String,
    pub unit_price_cents: u64,
    pub stock: u32,
}

impl CreateProductRequest {
    pub fn into_product(self) -> Product {
        Product::new(
            ProductId::new(self.id),
            self.name,
            self.unit_price_cents,
            self.stock,
        )
    }
}
