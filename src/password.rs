//! Password Hashing
//!
//! Argon2id hashing with a random salt per call. Hashes are stored in PHC
//! string format so the salt and cost parameters travel with the hash.

use crate::config::AuthConfig;
use crate::error::AuthError;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Argon2id password hasher
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher from the configured Argon2 cost parameters
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.argon2_memory_cost,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::Config(format!("invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash
    ///
    /// Uses the parameters embedded in `hash`. A malformed hash verifies as false.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        let mut config = AuthConfig::with_secret("test-secret");
        config.argon2_memory_cost = 1024;
        config.argon2_time_cost = 1;
        config.argon2_parallelism = 1;
        PasswordHasher::new(&config).unwrap()
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = fast_hasher();

        let first = hasher.hash("pw1").unwrap();
        let second = hasher.hash("pw1").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("pw1", &first));
        assert!(hasher.verify("pw1", &second));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct horse battery staple").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hasher = fast_hasher();
        let hash = hasher.hash("pw1").unwrap();

        assert!(!hasher.verify("pw2", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let hasher = fast_hasher();

        assert!(!hasher.verify("pw1", ""));
        assert!(!hasher.verify("pw1", "not-a-hash"));
        assert!(!hasher.verify("pw1", "$2b$12$truncated"));
    }

    #[test]
    fn test_verify_uses_embedded_parameters() {
        let hash = fast_hasher().hash("pw1").unwrap();
        let default_hasher = PasswordHasher::new(&AuthConfig::with_secret("test-secret")).unwrap();

        assert!(default_hasher.verify("pw1", &hash));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut config = AuthConfig::with_secret("test-secret");
        config.argon2_time_cost = 0;

        assert!(PasswordHasher::new(&config).is_err());
    }
}
