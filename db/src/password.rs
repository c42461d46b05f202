//! Argon2 password hashing shared by auth and the bulk import pipeline.
//!
//! Plaintext secrets are hashed immediately and never stored or logged.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// Verifies a plaintext password against a stored hash.
///
/// An unparsable stored hash counts as a mismatch rather than an error, so a
/// corrupted row cannot be used to log in.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("pass123").unwrap();
        assert_ne!(hash, "pass123");
        assert!(verify_password("pass123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn corrupted_hash_never_verifies() {
        assert!(!verify_password("pass123", "not-a-phc-string"));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let a = hash_password("pass123").unwrap();
        let b = hash_password("pass123").unwrap();
        assert_ne!(a, b);
    }
}
