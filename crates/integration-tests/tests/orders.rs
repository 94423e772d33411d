//! Order submission workflow: totals, atomicity, cart clearing, report
//! dispatch policy, and role-scoped history.

use axum::http::StatusCode;
use serde_json::json;

use feather_integration_tests::{TestApp, fixtures};

fn banana_order() -> serde_json::Value {
    json!({
        "items": [
            { "id": fixtures::BANANAS, "sku": "BAN001", "name": "Bananas",
              "quantity": 2, "unitPrice": 1.99 }
        ]
    })
}

#[tokio::test]
async fn submit_requires_authentication() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.post("/api/submit-order", banana_order()).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_order_is_rejected_and_nothing_is_persisted() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client
        .post("/api/submit-order", json!({ "items": [] }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "invalid_argument");
    assert_eq!(app.count("orders").await, 0);
    assert_eq!(app.count("order_items").await, 0);
}

#[tokio::test]
async fn zero_quantity_line_is_rejected() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client
        .post(
            "/api/submit-order",
            json!({
                "items": [
                    { "id": fixtures::BANANAS, "sku": "BAN001", "name": "Bananas",
                      "quantity": 0, "unitPrice": 1.99 }
                ]
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("orders").await, 0);
}

#[tokio::test]
async fn submitted_order_snapshots_totals_from_the_request() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client.post("/api/submit-order", banana_order()).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["totalAmount"], "3.98");
    let order_id = body["orderId"].as_i64().expect("order id");

    let (total, status): (String, String) =
        sqlx::query_as("SELECT total_amount, status FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_one(&app.pool)
            .await
            .expect("order row");
    assert_eq!(total, "3.98");
    assert_eq!(status, "submitted");

    let items: Vec<(i64, i64, String)> =
        sqlx::query_as("SELECT product_id, quantity, unit_price FROM order_items WHERE order_id = ?")
            .bind(order_id)
            .fetch_all(&app.pool)
            .await
            .expect("order item rows");
    assert_eq!(items, vec![(fixtures::BANANAS, 2, "1.99".to_string())]);
}

#[tokio::test]
async fn successful_submission_clears_the_cart() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    client
        .post(
            "/api/cart",
            json!({ "productId": fixtures::BANANAS, "quantity": 2 }),
        )
        .await;
    client
        .post(
            "/api/cart",
            json!({ "productId": fixtures::ALMOND_MILK, "quantity": 1 }),
        )
        .await;
    assert_eq!(app.count("cart_items").await, 2);

    let response = client.post("/api/submit-order", banana_order()).await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(app.count("cart_items").await, 0);
    let body = client.get("/api/cart").await.json();
    assert!(body.as_array().expect("array body").is_empty());
}

#[tokio::test]
async fn submission_dispatches_a_csv_report() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client.post("/api/submit-order", banana_order()).await;
    assert_eq!(response.status, StatusCode::OK);
    let order_id = response.json()["orderId"].as_i64().expect("order id");

    let reports = app.reports.lock().expect("reports lock");
    assert_eq!(reports.len(), 1);
    let report = &reports[0];

    assert_eq!(report.order_id.as_i64(), order_id);
    assert_eq!(report.account_name, "Joe's Grocery");
    assert_eq!(
        report.account_email.as_deref(),
        Some("orders@joesgrocery.example")
    );
    assert_eq!(report.filename(), format!("order-{order_id}.csv"));

    let csv = report.to_csv();
    let rows: Vec<&str> = csv.lines().collect();
    // header + one line item + trailing total row
    assert_eq!(rows.len(), 3);
    assert!(rows[1].contains("BAN001,Bananas,2,1.99,3.98"));
    assert!(rows[2].ends_with(",,TOTAL,,,3.98"));
}

#[tokio::test]
async fn failed_notification_keeps_the_order_and_the_cart() {
    let app = TestApp::with_failing_notifier().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    client
        .post(
            "/api/cart",
            json!({ "productId": fixtures::BANANAS, "quantity": 2 }),
        )
        .await;

    let response = client.post("/api/submit-order", banana_order()).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    let body = response.json();
    assert_eq!(body["error"], "notification_failed");
    let order_id = body["orderId"].as_i64().expect("committed order id");

    // The order committed before dispatch was attempted
    assert_eq!(app.count("orders").await, 1);
    let stored: i64 = sqlx::query_scalar("SELECT id FROM orders")
        .fetch_one(&app.pool)
        .await
        .expect("order row");
    assert_eq!(stored, order_id);

    // Dispatch did not succeed, so the cart is untouched
    assert_eq!(app.count("cart_items").await, 1);
}

#[tokio::test]
async fn an_admin_without_an_account_cannot_submit() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::SUNSHINE_ADMIN).await;

    let response = client.post("/api/submit-order", banana_order()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("orders").await, 0);
}

#[tokio::test]
async fn order_history_is_role_scoped() {
    let app = TestApp::new().await;

    let mut joe = app.client();
    joe.login(fixtures::JOE).await;
    let order_id = joe
        .post("/api/submit-order", banana_order())
        .await
        .json()["orderId"]
        .as_i64()
        .expect("order id");

    // The customer sees their own order
    let body = joe.get("/api/orders").await.json();
    let orders = body.as_array().expect("array body");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id);
    assert_eq!(orders[0]["accountId"], fixtures::JOES_GROCERY);
    assert_eq!(orders[0]["totalAmount"], "3.98");
    assert_eq!(orders[0]["status"], "submitted");

    // Another customer of the same distributor does not
    let mut fresh = app.client();
    fresh.login(fixtures::FRESH).await;
    let body = fresh.get("/api/orders").await.json();
    assert!(body.as_array().expect("array body").is_empty());

    // The distributor's admin does
    let mut admin = app.client();
    admin.login(fixtures::SUNSHINE_ADMIN).await;
    let body = admin.get("/api/orders").await.json();
    assert_eq!(body.as_array().expect("array body").len(), 1);

    // An admin of another distributor does not
    let mut northwind = app.client();
    northwind.login(fixtures::NORTHWIND_ADMIN).await;
    let body = northwind.get("/api/orders").await.json();
    assert!(body.as_array().expect("array body").is_empty());
}

#[tokio::test]
async fn order_items_are_scoped_like_the_history() {
    let app = TestApp::new().await;

    let mut joe = app.client();
    joe.login(fixtures::JOE).await;
    let order_id = joe
        .post("/api/submit-order", banana_order())
        .await
        .json()["orderId"]
        .as_i64()
        .expect("order id");

    let body = joe.get(&format!("/api/orders/{order_id}/items")).await.json();
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], fixtures::BANANAS);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["unitPrice"], "1.99");
    assert_eq!(items[0]["lineTotal"], "3.98");

    // Out-of-scope callers see the order as missing
    let mut fresh = app.client();
    fresh.login(fixtures::FRESH).await;
    let response = fresh.get(&format!("/api/orders/{order_id}/items")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let mut northwind = app.client();
    northwind.login(fixtures::NORTHWIND_ADMIN).await;
    let response = northwind
        .get(&format!("/api/orders/{order_id}/items"))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
