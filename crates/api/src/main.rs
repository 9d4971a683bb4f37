#[tokio::main]
async fn main() {
    carrito_observability::init();

    let limits = carrito_api::app::limits_from_env();
    let app = carrito_api::app::build_app(limits);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
