//! End-to-end test: a real server on a local port, driven over HTTP.
//!
//! The server writes its JSON files into a temporary directory, so no
//! external infrastructure is needed.

use std::time::Duration;

use actix_web::web;
use reqwest::Client;
use sales_tracker::{build_server, AppState, JsonFileStore};
use serde_json::{json, Value};
use tempfile::TempDir;

fn free_port() -> u16 {
    // Bind to port 0 to let the OS assign a free port, then release it.
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind failed")
        .local_addr()
        .expect("addr failed")
        .port()
}

/// Wait until `url` answers at all, retrying every `interval` for up to
/// `timeout` total. Panics if the service never comes up.
async fn wait_for_http(url: &str, timeout: Duration, interval: Duration) {
    let client = Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .unwrap();
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("server did not become ready within {:?}", timeout);
        }
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}

/// Record orders, move one through its lifecycle, read the dashboard, and
/// confirm everything landed in `orders.json`.
#[tokio::test]
async fn test_order_lifecycle_over_http() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let port = free_port();

    // ── 1. Start the server ──────────────────────────────────────────────────
    let state = web::Data::new(AppState::new(JsonFileStore::new(dir.path()), 20));
    let server = build_server(state, "127.0.0.1", port).expect("Failed to bind the server");
    tokio::spawn(server);

    let app_url = format!("http://127.0.0.1:{}", port);
    wait_for_http(
        &format!("{}/orders", app_url),
        Duration::from_secs(10),
        Duration::from_millis(100),
    )
    .await;

    let http = Client::new();

    // ── 2. POST two orders ───────────────────────────────────────────────────
    for (customer, quantity) in [("Amy", 3), ("Bo", 6)] {
        let resp = http
            .post(format!("{}/orders", app_url))
            .json(&json!({
                "customer": customer,
                "product": "Pen",
                "quantity": quantity,
                "price": 10.0,
                "username": "seller"
            }))
            .send()
            .await
            .expect("Failed to POST /orders");
        assert_eq!(resp.status(), 201, "Expected 201 Created from POST /orders");
    }

    // ── 3. Complete the first one ────────────────────────────────────────────
    let updated: Value = http
        .put(format!("{}/orders/1", app_url))
        .json(&json!({ "status": "Completed", "updatedBy": "seller" }))
        .send()
        .await
        .expect("Failed to PUT /orders/1")
        .json()
        .await
        .expect("Failed to parse PUT response body");
    assert_eq!(updated["status"], "Completed");

    // ── 4. Dashboard for the owning user ─────────────────────────────────────
    let board: Value = http
        .get(format!("{}/orders/analytics?username=seller", app_url))
        .send()
        .await
        .expect("Failed to GET /orders/analytics")
        .json()
        .await
        .expect("Failed to parse dashboard");
    assert_eq!(board["metrics"]["totalOrders"], 2);
    assert_eq!(board["metrics"]["completedOrders"], 1);
    assert_eq!(board["statusSummary"]["Awaiting Payment"], 1);
    assert_eq!(
        board["recommendation"],
        "Consider stocking up on \"Pen\". It's selling fast!"
    );

    // ── 5. The data file holds both orders ───────────────────────────────────
    let text = std::fs::read_to_string(dir.path().join("orders.json"))
        .expect("orders.json should exist");
    let stored: Vec<Value> = serde_json::from_str(&text).expect("orders.json is valid JSON");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["statusHistory"].as_array().map(Vec::len), Some(2));
}
