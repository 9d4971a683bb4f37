pub mod carts;
pub mod pay;
pub mod products;
pub mod system;
