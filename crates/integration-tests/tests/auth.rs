//! Session round-trip tests: login, identity, logout.

use axum::http::StatusCode;
use serde_json::json;

use feather_integration_tests::{TestApp, fixtures};

#[tokio::test]
async fn login_returns_identity_fields() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client
        .post(
            "/api/login",
            json!({ "username": "sunshine-admin", "password": "sunshine123" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "logged_in");
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["distributorName"], "Sunshine Distributors");
    assert_eq!(body["userType"], "admin");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client
        .post(
            "/api/login",
            json!({ "username": "sunshine-admin", "password": "wrong" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "invalid_credentials");
}

#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client
        .post(
            "/api/login",
            json!({ "username": "nobody", "password": "whatever" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_reflects_the_logged_in_user() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client.get("/api/me").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["user_id"], 2);
    assert_eq!(body["distributor_id"], 1);
    assert_eq!(body["distributor_name"], "Sunshine Distributors");
    assert_eq!(body["role"], "customer");
    assert_eq!(body["account_id"], fixtures::JOES_GROCERY);
}

#[tokio::test]
async fn me_without_session_is_unauthorized() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.get("/api/me").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "not_authenticated");
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = TestApp::new().await;
    let mut client = app.client();
    client.login(fixtures::JOE).await;

    let response = client.post("/api/logout", json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "logged_out");

    let response = client.get("/api/me").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let response = client.post("/api/logout", json!({})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "logged_out");
}
