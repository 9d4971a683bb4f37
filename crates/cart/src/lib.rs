//! Cart domain module.
//!
//! This crate contains the cart lifecycle business rules (quantity caps,
//! item merging, inactivity expiry), implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage). State transitions return a new
//! cart value or a typed failure; callers decide what to persist, which
//! makes all-or-nothing validation mechanical.

pub mod cart;
pub mod limits;

pub use cart::{Cart, CartItem};
pub use limits::CartLimits;
