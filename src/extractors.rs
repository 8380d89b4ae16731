//! Authentication Extractors
//!
//! Axum extractors for the bearer token and the authenticated user.

use crate::error::AuthError;
use crate::handlers::AuthState;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

/// Authenticated user resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

/// Pull the token out of an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively. A missing header, another
/// scheme or an empty credential is [`AuthError::NotAuthenticated`].
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::NotAuthenticated)?;

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::NotAuthenticated);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::NotAuthenticated);
    }

    Ok(token)
}

#[async_trait]
impl FromRequestParts<AuthState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        auth: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the require_auth middleware
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(&parts.headers)?;
        let username = auth.authorize(token)?;

        Ok(AuthUser { username })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        let headers = headers_with("bearer abc");
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn test_missing_header_not_authenticated() {
        let headers = HeaderMap::new();
        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn test_other_scheme_not_authenticated() {
        let headers = headers_with("Basic YWxpY2U6cHcx");
        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn test_empty_bearer_not_authenticated() {
        for value in ["Bearer", "Bearer ", "Bearer    "] {
            let headers = headers_with(value);
            let result = bearer_token(&headers);
            assert!(matches!(result, Err(AuthError::NotAuthenticated)), "{value:?}");
        }
    }
}
