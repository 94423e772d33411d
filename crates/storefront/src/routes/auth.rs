//! Authentication route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use feather_core::{Role, UserId};

use crate::error::Result;
use crate::middleware::{RequireUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
///
/// Field names are part of the public API contract and are preserved
/// verbatim, mixed casing included.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub user_id: UserId,
    #[serde(rename = "distributorName")]
    pub distributor_name: String,
    #[serde(rename = "userType")]
    pub user_type: Role,
}

/// Handle login.
///
/// Verifies the credentials and stores the identity in the session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = AuthService::new(state.pool())
        .login(&body.username, &body.password)
        .await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        status: "logged_in",
        user_id: user.id,
        distributor_name: user.distributor_name,
        user_type: user.role,
    }))
}

/// Handle logout.
///
/// Clears the identity and destroys the session. Always succeeds, even
/// without a session.
pub async fn logout(session: Session) -> Json<serde_json::Value> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session user");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to flush session");
    }

    Json(serde_json::json!({ "status": "logged_out" }))
}

/// Return the current session identity.
///
/// Unauthenticated callers are rejected by the extractor with a 401.
pub async fn me(RequireUser(user): RequireUser) -> Json<CurrentUser> {
    Json(user)
}
