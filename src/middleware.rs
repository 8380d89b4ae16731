//! Authentication Middleware
//!
//! Bearer-token validation for protected routes.

use crate::error::AuthError;
use crate::extractors::{bearer_token, AuthUser};
use crate::handlers::AuthState;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Require authenticated user
///
/// Validates the bearer token and stores the resolved [`AuthUser`] in
/// request extensions for use by extractors.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let username = {
        let token = bearer_token(req.headers())?;
        auth.authorize(token)?
    };

    req.extensions_mut().insert(AuthUser { username });

    Ok(next.run(req).await)
}
