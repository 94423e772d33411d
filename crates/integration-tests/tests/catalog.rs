//! Tenant scoping tests for product and account listings.

use axum::http::StatusCode;

use feather_integration_tests::{TestApp, fixtures};

#[tokio::test]
async fn items_require_authentication() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/api/items").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn items_are_scoped_to_the_distributor() {
    let app = TestApp::new().await;

    let mut sunshine = app.client();
    sunshine.login(fixtures::SUNSHINE_ADMIN).await;
    let body = sunshine.get("/api/items").await.json();
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 2);
    let skus: Vec<&str> = items.iter().map(|i| i["sku"].as_str().unwrap()).collect();
    assert_eq!(skus, vec!["BAN001", "ALM002"]);

    let mut northwind = app.client();
    northwind.login(fixtures::NORTHWIND_ADMIN).await;
    let body = northwind.get("/api/items").await.json();
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "SPK003");
    assert_eq!(items[0]["unitPrice"], "0.99");
}

#[tokio::test]
async fn customers_see_their_distributor_catalog() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let body = client.get("/api/items").await.json();

    assert_eq!(body.as_array().expect("array body").len(), 2);
}

#[tokio::test]
async fn admin_sees_all_distributor_accounts() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::SUNSHINE_ADMIN).await;

    let body = client.get("/api/accounts").await.json();
    let accounts = body.as_array().expect("array body");

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["name"], "Joe's Grocery");
    assert_eq!(accounts[1]["name"], "Fresh Farm Market");
}

#[tokio::test]
async fn customer_sees_only_their_own_account() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let body = client.get("/api/accounts").await.json();
    let accounts = body.as_array().expect("array body");

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["id"], fixtures::JOES_GROCERY);
    assert_eq!(accounts[0]["name"], "Joe's Grocery");
}

#[tokio::test]
async fn accounts_never_leak_across_distributors() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::NORTHWIND_ADMIN).await;

    let body = client.get("/api/accounts").await.json();
    let accounts = body.as_array().expect("array body");

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["name"], "City Mini Mart");
}
