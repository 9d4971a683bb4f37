use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use carrito_core::CartId;

use crate::app::errors;
use crate::app::services::AppServices;

/// Pay a cart: stock is decremented, the cart retired, and a tracking
/// number handed back.
pub async fn pay_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cart_id: CartId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cart id");
        }
    };

    match services.engine().pay(cart_id, Utc::now()) {
        Ok(receipt) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "payment processed",
                "tracking_number": receipt.tracking_number,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
