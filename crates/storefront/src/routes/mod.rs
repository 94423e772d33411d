//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/login            - Log in with username/password
//! POST   /api/logout           - Clear the session
//! GET    /api/me               - Current session identity
//!
//! # Catalog
//! GET    /api/items            - Products for the caller's distributor
//! GET    /api/accounts         - Accounts (admin: distributor-wide;
//!                                customer: own account only)
//!
//! # Cart
//! GET    /api/cart             - List cart lines
//! POST   /api/cart             - Add a product (replace quantity on repeat)
//! PUT    /api/cart/{item_id}   - Set a line's quantity
//! DELETE /api/cart/{item_id}   - Remove a line
//! DELETE /api/cart             - Clear the cart
//!
//! # Orders
//! POST   /api/submit-order     - Submit an order from posted line items
//! GET    /api/orders           - Order history, role-scoped
//! GET    /api/orders/{order_id}/items - Lines of one order
//!
//! # Provisioning
//! POST   /api/connect-account  - Admin-only: create a customer login
//! ```

pub mod accounts;
pub mod auth;
pub mod cart;
pub mod items;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
        // Catalog
        .route("/api/items", get(items::list))
        .route("/api/accounts", get(accounts::list))
        // Cart
        .route(
            "/api/cart",
            get(cart::list).post(cart::add).delete(cart::clear),
        )
        .route(
            "/api/cart/{item_id}",
            put(cart::update).delete(cart::remove),
        )
        // Orders
        .route("/api/submit-order", post(orders::submit))
        .route("/api/orders", get(orders::list))
        .route("/api/orders/{order_id}/items", get(orders::items))
        // Provisioning
        .route("/api/connect-account", post(accounts::connect))
}
