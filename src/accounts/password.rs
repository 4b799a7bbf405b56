//! Password hashing and verification
//!
//! Credentials are stored as Argon2id PHC strings with the salt embedded.
//! Verification parses the stored string and checks the candidate with the
//! hash function's constant-time comparison.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use super::AccountError;

/// Hash a cleartext password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hash(e.to_string()))
}

/// Verify a candidate password against a stored PHC hash string.
///
/// An unparseable stored hash counts as a mismatch rather than an error:
/// login has to answer yes or no.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
