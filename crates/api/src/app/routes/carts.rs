use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use carrito_core::{CartId, UserId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_cart).get(list_carts))
        .route(
            "/:id",
            get(get_cart)
                .delete(delete_cart)
                .put(replace_items)
                .patch(add_items),
        )
}

fn parse_cart_id(id: &str) -> Result<CartId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cart id")
    })
}

pub async fn create_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCartRequest>,
) -> axum::response::Response {
    match services
        .engine()
        .create_cart(UserId::new(body.user_id), Utc::now())
    {
        Ok(cart) => (StatusCode::CREATED, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_carts(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let carts = services.engine().list_carts(Utc::now());
    (StatusCode::OK, Json(serde_json::json!({ "items": carts }))).into_response()
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cart_id = match parse_cart_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.engine().get_cart(cart_id, Utc::now()) {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cart_id = match parse_cart_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.engine().delete_cart(cart_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn replace_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<Vec<dto::CartItemRequest>>,
) -> axum::response::Response {
    let cart_id = match parse_cart_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .engine()
        .replace_items(cart_id, dto::into_items(body), Utc::now())
    {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn add_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<Vec<dto::CartItemRequest>>,
) -> axum::response::Response {
    let cart_id = match parse_cart_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .engine()
        .add_items(cart_id, dto::into_items(body), Utc::now())
    {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
