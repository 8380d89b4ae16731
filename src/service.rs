//! Authentication Service
//!
//! Signup, login and bearer-token authorization on top of the user store,
//! the password hasher and the token codec.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::{AccessToken, UserRecord};
use crate::password::PasswordHasher;
use crate::store::UserStore;
use crate::token::TokenCodec;

use std::sync::Arc;
use tokio::sync::Mutex;

/// Authentication service
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenCodec,
    registration: Mutex<()>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: &AuthConfig, store: Arc<dyn UserStore>) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config)?;
        let tokens = TokenCodec::new(config)?;

        Ok(Self {
            store,
            hasher,
            tokens,
            registration: Mutex::new(()),
        })
    }

    /// Get reference to the user store
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Get reference to the token codec
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    // ============================================
    // Signup
    // ============================================

    /// Register a new user
    pub async fn signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        // Held across the existence check and the write.
        let _guard = self.registration.lock().await;

        if self.store.exists(username).await? {
            tracing::info!(username = %username, "Signup rejected, username taken");
            return Err(AuthError::UsernameTaken);
        }

        let hashed_password = self.hasher.hash(password)?;

        self.store
            .put(UserRecord {
                username: username.to_string(),
                hashed_password,
            })
            .await?;

        tracing::info!(username = %username, "User registered");
        Ok(())
    }

    // ============================================
    // Login
    // ============================================

    /// Authenticate a user and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let user = self.store.get(username).await?;

        let user = match user {
            Some(user) if self.hasher.verify(password, &user.hashed_password) => user,
            _ => {
                tracing::info!(username = %username, "Login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue_default(&user.username)?;

        tracing::info!(username = %user.username, "User logged in");
        Ok(AccessToken::bearer(token))
    }

    // ============================================
    // Authorization
    // ============================================

    /// Resolve a bearer token to the authenticated username
    pub fn authorize(&self, token: &str) -> Result<String, AuthError> {
        self.tokens
            .validate(token)
            .map(|claims| claims.sub)
            .ok_or(AuthError::Unauthorized)
    }
}
