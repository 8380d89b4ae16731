//! Access Tokens
//!
//! Signed, time-limited JWTs carrying the username as `sub`. Tokens are
//! stateless: validity depends only on the signature, the algorithm and
//! the current time.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::Claims;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Token issuer and validator
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    default_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Create a codec from the configured secret, algorithm and TTL
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        Ok(Self {
            algorithm: config.jwt_algorithm,
            default_ttl: config.access_token_ttl()?,
            encoding_key,
            decoding_key,
        })
    }

    /// Issue a token for `subject` with the configured lifetime
    pub fn issue_default(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, self.default_ttl)
    }

    /// Issue a token for `subject` valid for `ttl`
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            tracing::error!(ttl_seconds = ttl.num_seconds(), "Token expiry out of range");
            AuthError::Internal
        })?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token against the current time
    pub fn validate(&self, token: &str) -> Option<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`
    ///
    /// Returns `None` for a malformed token, a signature mismatch, an
    /// algorithm other than the configured one, or `now >= exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        // Expiry is checked below against `now`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("JWT validation failed: {:?}", e);
                return None;
            }
        };

        if now.timestamp() >= token_data.claims.exp {
            tracing::debug!(sub = %token_data.claims.sub, "JWT expired");
            return None;
        }

        Some(token_data.claims)
    }
}
