//! Feather Storefront - Multi-tenant storefront API server.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - `SQLite` for all persisted state (catalog, carts, orders, sessions)
//! - Cookie-keyed server-side sessions via tower-sessions
//! - Order reports dispatched over SMTP (lettre), or logged when no relay
//!   is configured

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feather_storefront::config::StorefrontConfig;
use feather_storefront::services::email::{LogNotifier, OrderNotifier, SmtpNotifier};
use feather_storefront::state::AppState;
use feather_storefront::{db, middleware, routes};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feather_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // NOTE: Schema migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p feather-cli -- migrate

    // Session store keeps its own table and migrates it here
    let session_store = SqliteStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .expect("Failed to prepare session store");
    let session_layer = middleware::session_layer(session_store, config.secure_cookies);

    // Order report notifier: SMTP when configured, log-only otherwise
    let notifier = build_notifier(&config);

    // Build application state
    let state = AppState::new(config.clone(), pool, notifier);

    // Build router
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(cors) = middleware::create_cors_layer(&config) {
        app = app.layer(cors);
    }

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Pick the order notifier from configuration.
fn build_notifier(config: &StorefrontConfig) -> Arc<dyn OrderNotifier> {
    match &config.email {
        Some(email) => {
            let notifier =
                SmtpNotifier::new(email).expect("Failed to initialize SMTP transport");
            tracing::info!(host = %email.smtp_host, "SMTP order notifier configured");
            Arc::new(notifier)
        }
        None => {
            tracing::warn!("SMTP not configured; order reports will be logged only");
            Arc::new(LogNotifier)
        }
    }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
