//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lemon_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    TooShort,
    #[error("Password must be at most {} characters", MAX_PASSWORD_LENGTH)]
    TooLong,
}

pub struct PasswordService;

impl PasswordService {
    pub fn check_policy(password: &str) -> Result<(), PasswordError> {
        let len = password.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        Ok(())
    }

    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("lemon-pass-1").unwrap();
        assert!(PasswordService::verify("lemon-pass-1", &hash).unwrap());
        assert!(!PasswordService::verify("lemon-pass-2", &hash).unwrap());
    }

    #[test]
    fn test_policy() {
        assert!(matches!(PasswordService::check_policy("short"), Err(PasswordError::TooShort)));
        assert!(PasswordService::check_policy("long enough").is_ok());
        let huge = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(matches!(PasswordService::check_policy(&huge), Err(PasswordError::TooLong)));
    }
}
