//! HTTP API application wiring (Axum router + service wiring).
//!
//! Structure:
//! - `services.rs`: store/engine wiring shared by all handlers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and their mapping onto domain types
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use chrono::Duration;

use carrito_cart::CartLimits;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(limits: CartLimits) -> Router {
    let services = Arc::new(services::build_services(limits));

    Router::new()
        .route("/", get(routes::system::root))
        .route("/health", get(routes::system::health))
        .nest("/carts", routes::carts::router())
        .nest("/products", routes::products::router())
        .route("/pay/:id", get(routes::pay::pay_cart))
        .layer(Extension(services))
}

/// Cart limits from the environment, with defaults for everything unset.
///
/// `CART_INACTIVITY_SECS` overrides the inactivity threshold; the quantity
/// caps stay at their defaults (15 total, 10 per product).
pub fn limits_from_env() -> CartLimits {
    match std::env::var("CART_INACTIVITY_SECS") {
        Ok(raw) => match raw.parse::<i64>() {
            Ok(secs) if secs > 0 => {
                CartLimits::with_inactivity_timeout(Duration::seconds(secs))
            }
            _ => {
                tracing::warn!(value = %raw, "ignoring invalid CART_INACTIVITY_SECS");
                CartLimits::default()
            }
        },
        Err(_) => CartLimits::default(),
    }
}
