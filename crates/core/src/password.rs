//! Argon2id credential hashing and verification.
//!
//! All hashes use the Argon2id variant with a random salt from [`OsRng`] and
//! are stored in PHC string format, so parameters and salt travel with the
//! hash. Callers outside this module only ever handle the PHC string.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::CoreError;

/// Hash a plaintext secret using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext secret against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate that a secret meets the minimum length.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

/// External capability that turns secrets into stored hashes and checks
/// secrets against them.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String, CoreError>;

    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, CoreError>;
}

/// [`CredentialVerifier`] backed by Argon2id.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, secret: &str) -> Result<String, CoreError> {
        hash_password(secret)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))
    }

    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, CoreError> {
        verify_password(secret, stored_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))
    }
}
