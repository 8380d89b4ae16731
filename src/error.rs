//! Authentication Error Types
//!
//! Centralized error handling for signup, login and bearer-token checks.
//! Credential and token failures collapse into one generic variant each so
//! callers never learn which factor failed.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Authentication errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("User store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal,
}

impl AuthError {
    /// Machine-readable error code used in response bodies
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UsernameTaken => "username_taken",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Unauthorized => "invalid_token",
            AuthError::NotAuthenticated => "not_authenticated",
            AuthError::StoreUnavailable(_) | AuthError::Internal => "internal_error",
            AuthError::Config(_) => "configuration_error",
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::UsernameTaken => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::Unauthorized
            | AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthError::StoreUnavailable(_) | AuthError::Config(_) | AuthError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            AuthError::StoreUnavailable(reason) => {
                tracing::error!(reason = %reason, "User store unavailable");
                "An internal error occurred".to_string()
            }
            AuthError::Config(reason) => {
                tracing::error!(reason = %reason, "Configuration error");
                "An internal error occurred".to_string()
            }
            AuthError::Internal => "An internal error occurred".to_string(),
            _ => self.to_string(),
        };

        let body = Json(serde_json::json!({
            "error": self.code(),
            "detail": detail
        }));

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("User store I/O error: {:?}", err);
        AuthError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("User store decode error: {:?}", err);
        AuthError::StoreUnavailable(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        AuthError::Internal
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("JWT encoding error: {:?}", err);
        AuthError::Internal
    }
}
