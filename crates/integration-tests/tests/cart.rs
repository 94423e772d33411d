//! Cart mutation semantics: replace-on-add, ownership, idempotent clear.

use axum::http::StatusCode;
use serde_json::json;

use feather_integration_tests::{TestApp, TestClient, fixtures};

async fn add(client: &mut TestClient, product_id: i64, quantity: i64) -> serde_json::Value {
    let response = client
        .post(
            "/api/cart",
            json!({ "productId": product_id, "quantity": quantity }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn cart_requires_authentication() {
    let app = TestApp::new().await;
    let mut client = app.client();

    assert_eq!(
        client.get("/api/cart").await.status,
        StatusCode::UNAUTHORIZED
    );
    let response = client
        .post("/api/cart", json!({ "productId": 1, "quantity": 1 }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn add_then_list_shows_exact_quantity() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let line = add(&mut client, fixtures::BANANAS, 4).await;
    assert_eq!(line["quantity"], 4);
    assert_eq!(line["product"]["sku"], "BAN001");
    assert_eq!(line["product"]["unitPrice"], "1.99");

    let body = client.get("/api/cart").await.json();
    let lines = body.as_array().expect("array body");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 4);
}

#[tokio::test]
async fn re_adding_replaces_quantity_instead_of_accumulating() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    add(&mut client, fixtures::BANANAS, 2).await;
    add(&mut client, fixtures::BANANAS, 5).await;

    let body = client.get("/api/cart").await.json();
    let lines = body.as_array().expect("array body");
    assert_eq!(lines.len(), 1, "repeat add must not create a second line");
    assert_eq!(lines[0]["quantity"], 5, "quantity is replaced, not summed");
}

#[tokio::test]
async fn adding_twice_with_same_quantity_is_idempotent() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    add(&mut client, fixtures::ALMOND_MILK, 3).await;
    add(&mut client, fixtures::ALMOND_MILK, 3).await;

    let body = client.get("/api/cart").await.json();
    let lines = body.as_array().expect("array body");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 3);
}

#[tokio::test]
async fn zero_quantity_add_is_rejected() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client
        .post(
            "/api/cart",
            json!({ "productId": fixtures::BANANAS, "quantity": 0 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "invalid_argument");
    assert_eq!(app.count("cart_items").await, 0);
}

#[tokio::test]
async fn adding_a_product_from_another_distributor_is_not_found() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client
        .post(
            "/api/cart",
            json!({ "productId": fixtures::SPARKLING_WATER, "quantity": 1 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_changes_quantity() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let line = add(&mut client, fixtures::BANANAS, 1).await;
    let item_id = line["id"].as_i64().expect("line id");

    let response = client
        .put(&format!("/api/cart/{item_id}"), json!({ "quantity": 7 }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = client.get("/api/cart").await.json();
    assert_eq!(body[0]["quantity"], 7);
}

#[tokio::test]
async fn update_rejects_zero_quantity() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let line = add(&mut client, fixtures::BANANAS, 1).await;
    let item_id = line["id"].as_i64().expect("line id");

    let response = client
        .put(&format!("/api/cart/{item_id}"), json!({ "quantity": 0 }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_on_another_users_item_is_not_found() {
    let app = TestApp::new().await;

    let mut joe = app.client();
    joe.login(fixtures::JOE).await;
    let line = add(&mut joe, fixtures::BANANAS, 2).await;
    let item_id = line["id"].as_i64().expect("line id");

    let mut fresh = app.client();
    fresh.login(fixtures::FRESH).await;
    let response = fresh
        .put(&format!("/api/cart/{item_id}"), json!({ "quantity": 9 }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Joe's cart is untouched
    let body = joe.get("/api/cart").await.json();
    assert_eq!(body[0]["quantity"], 2);
}

#[tokio::test]
async fn remove_on_another_users_item_is_not_found() {
    let app = TestApp::new().await;

    let mut joe = app.client();
    joe.login(fixtures::JOE).await;
    let line = add(&mut joe, fixtures::BANANAS, 2).await;
    let item_id = line["id"].as_i64().expect("line id");

    let mut fresh = app.client();
    fresh.login(fixtures::FRESH).await;
    let response = fresh.delete(&format!("/api/cart/{item_id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let body = joe.get("/api/cart").await.json();
    assert_eq!(body.as_array().expect("array body").len(), 1);
}

#[tokio::test]
async fn remove_deletes_the_line() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let line = add(&mut client, fixtures::BANANAS, 2).await;
    let item_id = line["id"].as_i64().expect("line id");

    let response = client.delete(&format!("/api/cart/{item_id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "removed");

    let body = client.get("/api/cart").await.json();
    assert!(body.as_array().expect("array body").is_empty());
}

#[tokio::test]
async fn remove_missing_item_is_not_found() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client.delete("/api/cart/9999").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_is_idempotent() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    add(&mut client, fixtures::BANANAS, 2).await;
    add(&mut client, fixtures::ALMOND_MILK, 1).await;

    let response = client.delete("/api/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "cleared");

    // Clearing an already-empty cart is a no-op, not an error
    let response = client.delete("/api/cart").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = client.get("/api/cart").await.json();
    assert!(body.as_array().expect("array body").is_empty());
}
