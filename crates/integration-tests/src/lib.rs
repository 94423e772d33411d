//! Integration test harness for Feather Storefront.
//!
//! Drives the real router in-process against an in-memory `SQLite`
//! database, so the suite needs no running server, external database, or
//! mail relay.
//!
//! # Test Categories
//!
//! - `auth` - Login/logout/session round trips
//! - `catalog` - Tenant-scoped product and account listings
//! - `cart` - Cart mutation semantics
//! - `orders` - Order submission, reports, and history scoping
//! - `connect_account` - Admin provisioning of customer logins

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use feather_storefront::config::StorefrontConfig;
use feather_storefront::db::MIGRATOR;
use feather_storefront::middleware::session_layer;
use feather_storefront::routes;
use feather_storefront::services::email::{NotifyError, OrderNotifier};
use feather_storefront::services::report::OrderReport;
use feather_storefront::state::AppState;

/// Notifier that records every delivered report.
pub struct RecordingNotifier {
    pub reports: Arc<Mutex<Vec<OrderReport>>>,
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn deliver(&self, report: &OrderReport) -> Result<(), NotifyError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// Notifier that always fails, for exercising the post-commit policy.
pub struct FailingNotifier;

#[async_trait]
impl OrderNotifier for FailingNotifier {
    async fn deliver(&self, _report: &OrderReport) -> Result<(), NotifyError> {
        Err(NotifyError::InvalidAddress("unreachable relay".to_string()))
    }
}

/// A fully wired application over an in-memory database.
pub struct TestApp {
    pub pool: SqlitePool,
    pub router: Router,
    /// Reports captured by the recording notifier (empty when the failing
    /// notifier is installed).
    pub reports: Arc<Mutex<Vec<OrderReport>>>,
}

impl TestApp {
    /// Build the app with a recording notifier.
    pub async fn new() -> Self {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let notifier = Arc::new(RecordingNotifier {
            reports: Arc::clone(&reports),
        });
        Self::build(notifier, reports).await
    }

    /// Build the app with a notifier that always fails.
    pub async fn with_failing_notifier() -> Self {
        Self::build(Arc::new(FailingNotifier), Arc::new(Mutex::new(Vec::new()))).await
    }

    async fn build(
        notifier: Arc<dyn OrderNotifier>,
        reports: Arc<Mutex<Vec<OrderReport>>>,
    ) -> Self {
        let pool = memory_pool().await;
        MIGRATOR.run(&pool).await.expect("migrations run");
        seed_fixtures(&pool).await;

        let state = AppState::new(test_config(), pool.clone(), notifier);
        let router = Router::new()
            .merge(routes::routes())
            .layer(session_layer(MemoryStore::default(), false))
            .with_state(state);

        Self {
            pool,
            router,
            reports,
        }
    }

    /// Create a client with its own cookie jar.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Count rows in a table.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

/// An in-memory `SQLite` pool pinned to a single connection so every query
/// sees the same database.
async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory pool")
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        allowed_origins: Vec::new(),
        secure_cookies: false,
        email: None,
    }
}

/// Well-known fixture logins.
pub mod fixtures {
    /// Admin of Sunshine Distributors (distributor 1).
    pub const SUNSHINE_ADMIN: (&str, &str) = ("sunshine-admin", "sunshine123");
    /// Customer bound to Joe's Grocery (account 1, distributor 1).
    pub const JOE: (&str, &str) = ("joe@joesgrocery.example", "123456");
    /// Customer bound to Fresh Farm Market (account 2, distributor 1).
    pub const FRESH: (&str, &str) = ("fresh@freshfarm.example", "654321");
    /// Admin of Northwind Wholesalers (distributor 2).
    pub const NORTHWIND_ADMIN: (&str, &str) = ("northwind-admin", "northwind123");

    /// Product ids seeded for distributor 1.
    pub const BANANAS: i64 = 1;
    pub const ALMOND_MILK: i64 = 2;
    /// Product id seeded for distributor 2.
    pub const SPARKLING_WATER: i64 = 3;

    /// Account ids.
    pub const JOES_GROCERY: i64 = 1;
    pub const FRESH_FARM: i64 = 2;
    pub const CITY_MINI_MART: i64 = 3;
}

async fn seed_fixtures(pool: &SqlitePool) {
    let statements = [
        // Distributor 1: Sunshine Distributors
        "INSERT INTO accounts (id, distributor_id, name, city, state, price_level, payment_terms, email)
         VALUES (1, 1, 'Joe''s Grocery', 'Springfield', 'OR', 'standard', 'net30', 'orders@joesgrocery.example')",
        "INSERT INTO accounts (id, distributor_id, name, city, state, price_level, payment_terms, email)
         VALUES (2, 1, 'Fresh Farm Market', 'Eugene', 'OR', 'preferred', 'net15', 'buyer@freshfarm.example')",
        "INSERT INTO products (id, distributor_id, name, sku, unit_price, category)
         VALUES (1, 1, 'Organic Bananas', 'BAN001', '1.99', 'produce')",
        "INSERT INTO products (id, distributor_id, name, sku, unit_price, category)
         VALUES (2, 1, 'Almond Milk', 'ALM002', '3.49', 'dairy')",
        "INSERT INTO users (id, username, password, distributor_id, distributor_name, role, account_id)
         VALUES (1, 'sunshine-admin', 'sunshine123', 1, 'Sunshine Distributors', 'admin', NULL)",
        "INSERT INTO users (id, username, password, distributor_id, distributor_name, role, account_id)
         VALUES (2, 'joe@joesgrocery.example', '123456', 1, 'Sunshine Distributors', 'customer', 1)",
        "INSERT INTO users (id, username, password, distributor_id, distributor_name, role, account_id)
         VALUES (3, 'fresh@freshfarm.example', '654321', 1, 'Sunshine Distributors', 'customer', 2)",
        // Distributor 2: Northwind Wholesalers
        "INSERT INTO accounts (id, distributor_id, name, city, state, price_level, payment_terms, email)
         VALUES (3, 2, 'City Mini Mart', 'Portland', 'OR', 'standard', 'net30', 'manager@cityminimart.example')",
        "INSERT INTO products (id, distributor_id, name, sku, unit_price, category)
         VALUES (3, 2, 'Sparkling Water', 'SPK003', '0.99', 'beverages')",
        "INSERT INTO users (id, username, password, distributor_id, distributor_name, role, account_id)
         VALUES (4, 'northwind-admin', 'northwind123', 2, 'Northwind Wholesalers', 'admin', NULL)",
        "INSERT INTO users (id, username, password, distributor_id, distributor_name, role, account_id)
         VALUES (5, 'mini@cityminimart.example', '111111', 2, 'Northwind Wholesalers', 'customer', 3)",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await.expect("fixture insert");
    }
}

/// A response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }
}

/// A request client that carries the session cookie between calls, like a
/// browser would.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    async fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("cookie header");
            let pair = raw.split(';').next().unwrap_or_default().to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");

        TestResponse {
            status,
            body: bytes.to_vec(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Log in with a fixture credential pair and assert success.
    pub async fn login(&mut self, (username, password): (&str, &str)) -> TestResponse {
        let response = self
            .post(
                "/api/login",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login should succeed");
        response
    }
}
