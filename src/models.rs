//! Authentication Models
//!
//! Stored records, form payloads, response bodies and token claims.

use serde::{Deserialize, Serialize};

// ============================================
// Stored Entities
// ============================================

/// User record as persisted in the user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub hashed_password: String,
}

// ============================================
// Request DTOs
// ============================================

/// Signup form
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

/// Login form
///
/// Follows the OAuth2 password grant form. Only `username` and `password`
/// are used; `grant_type`, `scope`, `client_id` and `client_secret` are
/// accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// ============================================
// Response DTOs
// ============================================

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Simple message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// ============================================
// JWT Claims
// ============================================

/// JWT claims for access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}
