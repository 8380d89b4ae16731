//! Authentication HTTP Handlers
//!
//! Form-based signup and login plus one bearer-protected resource.

use crate::error::AuthError;
use crate::extractors::AuthUser;
use crate::middleware;
use crate::models::*;
use crate::service::AuthService;

use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{get, post},
    Form, Json, Router,
};
use std::sync::Arc;

/// Shared auth service state
pub type AuthState = Arc<AuthService>;

// ============================================
// Route Builder
// ============================================

/// Create authentication routes
pub fn create_routes(auth_service: AuthState) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login));

    // Protected routes (require a valid bearer token)
    let protected = Router::new()
        .route("/protected", get(protected_route))
        .layer(axum_middleware::from_fn_with_state(
            auth_service.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(auth_service)
}

// ============================================
// Handlers
// ============================================

/// POST /signup
///
/// Register a new user account
pub async fn signup(
    State(auth): State<AuthState>,
    Form(form): Form<SignupForm>,
) -> Result<Json<MessageResponse>, AuthError> {
    auth.signup(&form.username, &form.password).await?;

    Ok(Json(MessageResponse::new("User created successfully")))
}

/// POST /login
///
/// Verify credentials and return a bearer token
pub async fn login(
    State(auth): State<AuthState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<AccessToken>, AuthError> {
    let token = auth.login(&form.username, &form.password).await?;

    Ok(Json(token))
}

/// GET /protected
pub async fn protected_route(user: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Hello {}, you are authenticated.",
        user.username
    )))
}
