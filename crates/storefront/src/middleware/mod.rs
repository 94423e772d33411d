//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. Session layer (tower-sessions with `SQLite` store)
//! 3. CORS (configured origins, credentials allowed)

pub mod auth;
pub mod cors;
pub mod session;

pub use auth::{RequireAdmin, RequireUser, clear_current_user, set_current_user};
pub use cors::create_cors_layer;
pub use session::{SESSION_COOKIE_NAME, session_layer};
