//! Infrastructure layer: in-memory stores and the cart engine.
//!
//! The domain crates stay pure; everything that holds state or coordinates
//! a multi-step operation lives here. Stores are trait-abstracted so the
//! engine can be exercised with any backing implementation.

pub mod cart_store;
pub mod catalog_store;
pub mod engine;


pub use cart_store::{CartStore, InMemoryCartStore};
pub use catalog_store::{CatalogStore, InMemoryCatalogStore};
pub use engine::{CartEngine, Receipt};
