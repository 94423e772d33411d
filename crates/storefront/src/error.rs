//! Unified error handling for the storefront API.
//!
//! Provides a unified `AppError` type mapping the domain error taxonomy to
//! HTTP responses. All route handlers should return `Result<T, AppError>`.
//! Storage failures are logged server-side and masked in the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use feather_core::OrderId;

use crate::db::RepositoryError;
use crate::services::accounts::ConnectError;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// No resolvable session on a protected operation.
    #[error("not authenticated")]
    Unauthenticated,

    /// Authenticated, but the role does not permit the operation.
    #[error("forbidden: {0}")]
    Unauthorized(String),

    /// Malformed or out-of-range input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Resource absent, or not owned by the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate resource (e.g., username already taken).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Login failed.
    #[error("auth error: {0}")]
    Auth(AuthError),

    /// The order committed but the report could not be dispatched.
    #[error("order {order_id} stored but notification failed")]
    NotificationFailed { order_id: OrderId },

    /// Underlying persistence failure.
    #[error("storage error: {0}")]
    Storage(RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable error code for the JSON body.
    const fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "not_authenticated",
            Self::Unauthorized(_) => "forbidden",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Auth(_) => "invalid_credentials",
            Self::NotificationFailed { .. } => "notification_failed",
            Self::Storage(_) | Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server-side failures before masking them
        if matches!(self, Self::Storage(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotificationFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Storage(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::Repository(_) => "Internal server error".to_string(),
            },
            _ => self.to_string(),
        };

        // A failed notification must still tell the caller which order
        // committed, so the body carries the order id.
        let body = match &self {
            Self::NotificationFailed { order_id } => json!({
                "error": self.code(),
                "message": message,
                "orderId": order_id,
            }),
            _ => json!({
                "error": self.code(),
                "message": message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::AlreadyExists(msg),
            other => Self::Storage(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Empty | OrderError::InvalidLine(_) | OrderError::NoAccount => {
                Self::InvalidArgument(err.to_string())
            }
            OrderError::Notification { order_id, .. } => Self::NotificationFailed { order_id },
            OrderError::Repository(e) => e.into(),
        }
    }
}

impl From<ConnectError> for AppError {
    fn from(err: ConnectError) -> Self {
        match err {
            ConnectError::InvalidEmail(_) => Self::InvalidArgument(err.to_string()),
            ConnectError::AccountNotFound => Self::NotFound(err.to_string()),
            ConnectError::UserAlreadyExists => Self::AlreadyExists(err.to_string()),
            ConnectError::Repository(e) => e.into(),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("cart item 3".to_string());
        assert_eq!(err.to_string(), "not found: cart item 3");

        let err = AppError::InvalidArgument("quantity must be at least 1".to_string());
        assert_eq!(err.to_string(), "invalid argument: quantity must be at least 1");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::Unauthorized("admins only".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::InvalidArgument("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("gone".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::AlreadyExists("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::NotificationFailed {
                order_id: OrderId::new(1)
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_repository_conflict_maps_to_409() {
        let err: AppError = RepositoryError::Conflict("username already exists".to_owned()).into();
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }
}
