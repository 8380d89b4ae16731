//! Authentication Configuration
//!
//! Configuration is read once at startup and handed to the service by
//! reference. No component reads the environment after that.

use crate::error::AuthError;
use jsonwebtoken::Algorithm;
use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fmt};

const DEFAULT_ALGORITHM: Algorithm = Algorithm::HS256;
const DEFAULT_EXPIRE_MINUTES: i64 = 30;
const DEFAULT_USER_DB_FILE: &str = "users.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens (from SECRET_KEY env var)
    pub secret_key: String,

    /// Token signing algorithm (from JWT_ALGORITHM env var)
    pub jwt_algorithm: Algorithm,

    /// Token lifetime in minutes (from ACCESS_TOKEN_EXPIRE_MINUTES env var)
    pub access_token_expire_minutes: i64,

    /// Path of the JSON user file (from USER_DB_FILE env var)
    pub user_db_file: PathBuf,

    /// Listen address for the HTTP server (from BIND_ADDR env var)
    pub bind_addr: String,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AuthConfig {
    /// Configuration with the given secret and every other value at its default
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            jwt_algorithm: DEFAULT_ALGORITHM,
            access_token_expire_minutes: DEFAULT_EXPIRE_MINUTES,
            user_db_file: PathBuf::from(DEFAULT_USER_DB_FILE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            argon2_memory_cost: argon2::Params::DEFAULT_M_COST,
            argon2_time_cost: argon2::Params::DEFAULT_T_COST,
            argon2_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY").unwrap_or_default();
        let mut config = Self::with_secret(secret_key);

        if let Some(alg) = lookup("JWT_ALGORITHM") {
            config.jwt_algorithm = Algorithm::from_str(alg.trim()).map_err(|_| {
                AuthError::Config(format!("JWT_ALGORITHM `{alg}` is not a known algorithm"))
            })?;
        }

        config.access_token_expire_minutes = parse_var(
            &lookup,
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            config.access_token_expire_minutes,
        )?;

        if let Some(path) = lookup("USER_DB_FILE") {
            config.user_db_file = PathBuf::from(path);
        }

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }

        config.argon2_memory_cost =
            parse_var(&lookup, "ARGON2_MEMORY_COST", config.argon2_memory_cost)?;
        config.argon2_time_cost = parse_var(&lookup, "ARGON2_TIME_COST", config.argon2_time_cost)?;
        config.argon2_parallelism =
            parse_var(&lookup, "ARGON2_PARALLELISM", config.argon2_parallelism)?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.secret_key.trim().is_empty() {
            return Err(AuthError::Config(
                "SECRET_KEY environment variable must be set".to_string(),
            ));
        }

        if self.secret_key.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                length = self.secret_key.len(),
                "SECRET_KEY is shorter than {} bytes",
                RECOMMENDED_SECRET_LEN
            );
        }

        if !matches!(
            self.jwt_algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Config(format!(
                "JWT_ALGORITHM {:?} is not supported, use HS256, HS384 or HS512",
                self.jwt_algorithm
            )));
        }

        if self.access_token_expire_minutes <= 0 {
            return Err(AuthError::Config(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be positive".to_string(),
            ));
        }

        let ttl = self.access_token_ttl()?;
        if chrono::Utc::now().checked_add_signed(ttl).is_none() {
            return Err(AuthError::Config(
                "ACCESS_TOKEN_EXPIRE_MINUTES is too large".to_string(),
            ));
        }

        argon2::Params::new(
            self.argon2_memory_cost,
            self.argon2_time_cost,
            self.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::Config(format!("invalid Argon2 parameters: {e}")))?;

        Ok(())
    }

    /// Configured token lifetime
    pub fn access_token_ttl(&self) -> Result<chrono::Duration, AuthError> {
        chrono::Duration::try_minutes(self.access_token_expire_minutes).ok_or_else(|| {
            AuthError::Config("ACCESS_TOKEN_EXPIRE_MINUTES is too large".to_string())
        })
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("user_db_file", &self.user_db_file)
            .field("bind_addr", &self.bind_addr)
            .field("argon2_memory_cost", &self.argon2_memory_cost)
            .field("argon2_time_cost", &self.argon2_time_cost)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .finish()
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AuthError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AuthError::Config(format!("{key} has an invalid value `{raw}`"))),
        None => Ok(default),
    }
}
