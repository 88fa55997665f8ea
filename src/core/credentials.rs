//! Credential hashing
//!
//! Passwords are stored as salted Argon2id PHC strings. Verification reads
//! the cost parameters back out of the stored hash, so changing the hashing
//! cost never invalidates existing credentials.

use crate::types::{Credential, EngineError};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::{error, warn};

/// Hashes and verifies operator passwords
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Create a hasher with the given Argon2 memory cost (KiB) and iteration count
    ///
    /// Invalid parameters fall back to the Argon2 defaults.
    pub fn new(memory_kib: u32, iterations: u32) -> Self {
        let params = Params::new(memory_kib, iterations, 1, None).unwrap_or_else(|e| {
            warn!(memory_kib, iterations, error = %e, "Invalid hashing cost, using defaults");
            Params::default()
        });
        CredentialHasher { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<Credential, EngineError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Credential::Hashed(hash.to_string()))
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                EngineError::HashingFailed
            })
    }

    /// Whether `password` matches `credential`
    pub fn verify(&self, credential: &Credential, password: &str) -> bool {
        match credential {
            Credential::Hashed(hash) => match PasswordHash::new(hash) {
                Ok(parsed) => self
                    .argon2()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    warn!(error = %e, "Stored credential is not a valid password hash");
                    false
                }
            },
            Credential::Plaintext(stored) => stored == password,
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        CredentialHasher {
            params: Params::default(),
        }
    }
}
