//! RustPress Token Authentication
//!
//! Minimal credential authentication service providing:
//! - User signup backed by a whole-file JSON user store
//! - Argon2id password hashing
//! - Login issuing short-lived JWT bearer tokens
//! - A bearer-protected resource
//!
//! # Configuration
//!
//! Configuration is loaded once from environment variables (and `.env`):
//! - `SECRET_KEY` - Secret key for signing JWTs (required)
//! - `JWT_ALGORITHM` - `HS256`, `HS384` or `HS512` (default: `HS256`)
//! - `ACCESS_TOKEN_EXPIRE_MINUTES` - Token lifetime in minutes (default: 30)
//! - `USER_DB_FILE` - Path of the JSON user file (default: `users.json`)
//! - `BIND_ADDR` - HTTP listen address (default: `0.0.0.0:8000`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use rustpress_token_auth::{AuthConfig, AuthService, JsonFileStore};
//!
//! let config = AuthConfig::from_env()?;
//! config.validate()?;
//!
//! let store = Arc::new(JsonFileStore::open(&config.user_db_file).await?);
//! let auth = Arc::new(AuthService::new(&config, store)?);
//! let app = rustpress_token_auth::create_routes(auth);
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use handlers::{create_routes, AuthState};
pub use models::*;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use store::{JsonFileStore, MemoryStore, UserStore};
pub use token::TokenCodec;
