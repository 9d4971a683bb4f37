//! Store and engine wiring shared by all handlers.

use std::sync::Arc;

use carrito_cart::CartLimits;
use carrito_infra::{CartEngine, InMemoryCartStore, InMemoryCatalogStore};

/// Application services: the cart engine plus direct catalog access for the
/// catalog-management routes (which bypass the engine by design — catalog
/// CRUD is not part of the cart state machine).
pub struct AppServices {
    engine: CartEngine,
    catalog: Arc<InMemoryCatalogStore>,
}

impl AppServices {
    pub fn engine(&self) -> &CartEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &InMemoryCatalogStore {
        &self.catalog
    }
}

/// Wire up in-memory stores and the engine.
pub fn build_services(limits: CartLimits) -> AppServices {
    let catalog = Arc::new(InMemoryCatalogStore::new());
    let carts = Arc::new(InMemoryCartStore::new());
    let engine = CartEngine::new(carts, catalog.clone(), limits);

    AppServices { engine, catalog }
}
