//! Argon2 password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error("Password must be at least {0} characters")]
    TooShort(usize),
}

/// Hash a plaintext password with a random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a plaintext password against a stored hash. Malformed hashes
/// verify as false rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Enforce the minimum length for user-supplied passwords
pub fn validate_password(password: &str, min_length: usize) -> Result<(), PasswordError> {
    if password.chars().count() < min_length {
        return Err(PasswordError::TooShort(min_length));
    }
    Ok(())
}

/// Initial password assigned to auto-provisioned technician accounts
pub fn default_password(employee_code: &str) -> String {
    format!("{}@forge2024", employee_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("secret123", "not-a-hash"));
    }

    #[test]
    fn test_default_password_format() {
        assert_eq!(default_password("TEC001"), "TEC001@forge2024");
    }

    #[test]
    fn test_minimum_length() {
        assert!(validate_password("1234567", 8).is_err());
        assert!(validate_password("12345678", 8).is_ok());
    }
}
