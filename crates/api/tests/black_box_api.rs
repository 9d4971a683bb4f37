use chrono::Duration;
use reqwest::StatusCode;
use serde_json::json;

use carrito_cart::CartLimits;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(limits: CartLimits) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = carrito_api::app::build_app(limits);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn spawn_default() -> Self {
        Self::spawn(CartLimits::default()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn seed_product(
    client: &reqwest::Client,
    base_url: &str,
    id: i64,
    name: &str,
    stock: u32,
) {
    let res = client
        .post(format!("{}/products", base_url))
        .json(&json!({
            "id": id,
            "name": name,
            "unit_price_cents": 1000,
            "stock": stock,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn create_cart(client: &reqwest::Client, base_url: &str, user_id: &str) -> serde_json::Value {
    let res = client
        .post(format!("{}/carts", base_url))
        .json(&json!({"user_id": user_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn root_and_health_respond() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    for path in ["/", "/health"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn create_cart_returns_the_new_cart() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    assert_eq!(cart["user_id"], "alice");
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn second_cart_for_the_same_user_conflicts() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    create_cart(&client, &srv.base_url, "alice").await;

    let res = client
        .post(format!("{}/carts", srv.base_url))
        .json(&json!({"user_id": "alice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn deleting_a_cart_allows_a_new_one_for_the_user() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    let cart_id = cart["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/carts/{}", srv.base_url, cart_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let second = create_cart(&client, &srv.base_url, "alice").await;
    assert_ne!(second["id"], cart["id"]);
}

#[tokio::test]
async fn double_delete_is_not_found_the_second_time() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    let url = format!("{}/carts/{}", srv.base_url, cart["id"].as_str().unwrap());

    let first = client.delete(&url).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = client.delete(&url).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_and_malformed_cart_ids_are_rejected() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/carts/00000000-0000-7000-8000-000000000000",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/carts/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_merges_items_and_enforces_caps() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    seed_product(&client, &srv.base_url, 100, "Keyboard", 50).await;
    seed_product(&client, &srv.base_url, 200, "Mouse", 50).await;

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    let url = format!("{}/carts/{}", srv.base_url, cart["id"].as_str().unwrap());

    // Add, then add the same product again: quantities accumulate.
    let res = client
        .patch(&url)
        .json(&json!([{"product_id": 100, "quantity": 2}]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .patch(&url)
        .json(&json!([
            {"product_id": 100, "quantity": 3},
            {"product_id": 200, "quantity": 1},
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_id"], 100);
    assert_eq!(items[0]["quantity"], 5);

    // Pushing one product past 10 units fails, cart unchanged.
    let res = client
        .patch(&url)
        .json(&json!([{"product_id": 100, "quantity": 6}]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(&url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"][0]["quantity"], 5);
}

#[tokio::test]
async fn patch_with_unknown_product_is_not_found() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    let url = format!("{}/carts/{}", srv.base_url, cart["id"].as_str().unwrap());

    let res = client
        .patch(&url)
        .json(&json!([{"product_id": 999, "quantity": 1}]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_replaces_items_and_rejects_insufficient_stock() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    seed_product(&client, &srv.base_url, 100, "Keyboard", 50).await;
    seed_product(&client, &srv.base_url, 300, "Monitor", 2).await;

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    let url = format!("{}/carts/{}", srv.base_url, cart["id"].as_str().unwrap());

    let res = client
        .patch(&url)
        .json(&json!([{"product_id": 100, "quantity": 5}]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Quantity over the monitor's stock: conflict, prior items untouched.
    let res = client
        .put(&url)
        .json(&json!([{"product_id": 300, "quantity": 3}]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client.get(&url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"][0]["product_id"], 100);
    assert_eq!(body["items"][0]["quantity"], 5);

    // Within stock: wholesale replacement.
    let res = client
        .put(&url)
        .json(&json!([{"product_id": 300, "quantity": 2}]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], 300);
}

#[tokio::test]
async fn pay_decrements_stock_and_retires_the_cart() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    seed_product(&client, &srv.base_url, 100, "Keyboard", 10).await;

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    let cart_id = cart["id"].as_str().unwrap();
    let cart_url = format!("{}/carts/{}", srv.base_url, cart_id);

    let res = client
        .patch(&cart_url)
        .json(&json!([{"product_id": 100, "quantity": 4}]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/pay/{}", srv.base_url, cart_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let tracking = body["tracking_number"].as_str().unwrap();
    let suffix = tracking.strip_prefix("PEDIDO-").unwrap();
    assert_eq!(suffix.len(), 8);
    assert!(
        suffix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );

    // Stock went 10 -> 6; the cart is gone.
    let res = client
        .get(format!("{}/products/100", srv.base_url))
        .send()
        .await
        .unwrap();
    let product: serde_json::Value = res.json().await.unwrap();
    assert_eq!(product["stock"], 6);

    let res = client.get(&cart_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn paying_an_empty_cart_is_a_bad_request() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let cart = create_cart(&client, &srv.base_url, "alice").await;

    let res = client
        .get(format!(
            "{}/pay/{}",
            srv.base_url,
            cart["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn an_inactive_cart_expires_and_reports_gone() {
    // Aggressively short threshold so the test does not wait long.
    let srv = TestServer::spawn(CartLimits::with_inactivity_timeout(
        Duration::milliseconds(50),
    ))
    .await;
    let client = reqwest::Client::new();

    let cart = create_cart(&client, &srv.base_url, "alice").await;
    let url = format!("{}/carts/{}", srv.base_url, cart["id"].as_str().unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(120)).await;

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::GONE);

    // The expired cart was removed on that access.
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // And the user can immediately open a fresh cart.
    create_cart(&client, &srv.base_url, "alice").await;
}

#[tokio::test]
async fn list_carts_returns_only_live_carts() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    create_cart(&client, &srv.base_url, "alice").await;
    create_cart(&client, &srv.base_url, "bob").await;

    let res = client
        .get(format!("{}/carts", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}
