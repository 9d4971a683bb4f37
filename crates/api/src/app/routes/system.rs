use axum::{Json, http::StatusCode, response::IntoResponse};

pub async fn root() -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Shopping cart API. See /products for the catalog and /carts for cart operations.",
        })),
    )
        .into_response()
}

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}
