//! Credential hashing
//!
//! Passwords are never stored. Records carry an Argon2id PHC string with a
//! random salt; login verifies the candidate against it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use super::error::{AuthError, AuthResult};

/// Argon2id hasher with configurable cost
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHasher {
    /// Build a hasher from memory cost (KiB), iterations and lanes
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> AuthResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Credential(e.to_string()))?;
        Ok(Self { params })
    }

    /// Minimum-cost parameters. Only suitable for tests and benchmarks.
    pub fn insecure_fast() -> Self {
        Self {
            params: Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
                .unwrap_or_default(),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(AuthError::from)
    }

    /// Check a password against a stored PHC string.
    ///
    /// Parameters embedded in the stored hash win over this hasher's, so
    /// records hashed at a different cost still verify.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored credential is not a valid hash");
                return false;
            }
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = CredentialHasher::insecure_fast();
        let hash = hasher.hash("admin123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("admin123", &hash));
        assert!(!hasher.verify("wrongpass", &hash));
    }

    #[test]
    fn test_salted() {
        let hasher = CredentialHasher::insecure_fast();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_plaintext_is_never_accepted_as_hash() {
        let hasher = CredentialHasher::insecure_fast();
        assert!(!hasher.verify("admin123", "admin123"));
    }

    #[test]
    fn test_verify_across_cost_settings() {
        let cheap = CredentialHasher::insecure_fast();
        let other = CredentialHasher::new(64, 1, 1).unwrap();
        let hash = cheap.hash("p").unwrap();
        assert!(other.verify("p", &hash));
    }

    #[test]
    fn test_invalid_params() {
        assert!(CredentialHasher::new(0, 0, 0).is_err());
    }
}
