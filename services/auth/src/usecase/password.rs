//! Password hashing with Argon2id.
//!
//! The per-call random salt is embedded in the PHC output string, so no
//! separate salt storage exists. Default Argon2id parameters give the
//! deliberately non-trivial work factor.

use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use crate::error::AuthServiceError;

/// Hash a plaintext password. Fails only on resource exhaustion inside the
/// hasher.
pub fn hash_password(plaintext: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthServiceError::Internal(anyhow!("argon2 hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext against a stored PHC hash string. Unparseable hashes
/// verify false rather than erroring — a corrupt stored hash must not grant
/// access.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
