//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored as `salt_hex:key_hex`, both hex-encoded, with fixed
//! derivation parameters. Verification distinguishes a malformed stored hash
//! (an operational fault) from a clean mismatch.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::{rng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

const MEMORY_COST_KIB: u32 = 15360;
const TIME_COST: u32 = 3;
const PARALLELISM: u32 = 2;
const SALT_LENGTH: usize = 16;
const KEY_LENGTH: usize = 32;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,
}

fn argon2() -> Result<Argon2<'static>, PasswordError> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(KEY_LENGTH))
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?,
    ))
}

/// Hashes a password with a fresh random salt.
///
/// # Errors
///
/// Returns an error if key derivation fails.
pub fn hash_password(password: &SecretString) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LENGTH];
    rng().fill_bytes(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    argon2()?
        .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut key)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(format!("{}:{}", hex::encode(salt), hex::encode(key)))
}

/// Verifies a password against a stored `salt_hex:key_hex` hash.
///
/// # Errors
///
/// `InvalidHashFormat` when the stored value cannot be parsed;
/// `VerificationFailed` when the password does not match.
pub fn verify_password(password: &SecretString, stored: &str) -> Result<(), PasswordError> {
    let (salt_hex, key_hex) = stored
        .split_once(':')
        .ok_or(PasswordError::InvalidHashFormat)?;

    let salt = hex::decode(salt_hex).map_err(|_| PasswordError::InvalidHashFormat)?;
    let stored_key = hex::decode(key_hex).map_err(|_| PasswordError::InvalidHashFormat)?;
    if salt.is_empty() || stored_key.len() != KEY_LENGTH {
        return Err(PasswordError::InvalidHashFormat);
    }

    let mut computed = [0u8; KEY_LENGTH];
    argon2()?
        .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut computed)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    if computed.as_slice().ct_eq(&stored_key).into() {
        Ok(())
    }
    else {
        Err(PasswordError::VerificationFailed)
    }
}

/// Password strength rules violated by a candidate password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordValidationError {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl std::fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort => {
                write!(f, "must be at least {} characters", MIN_PASSWORD_LENGTH)
            },
            Self::MissingUppercase => write!(f, "must contain an uppercase letter"),
            Self::MissingLowercase => write!(f, "must contain a lowercase letter"),
            Self::MissingDigit => write!(f, "must contain a digit"),
        }
    }
}

/// Checks password strength, collecting every violated rule.
///
/// # Errors
///
/// Returns the full list of violated rules so a caller can report all of
/// them at once.
pub fn validate_password_strength(password: &str) -> Result<(), Vec<PasswordValidationError>> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(PasswordValidationError::TooShort);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        errors.push(PasswordValidationError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        errors.push(PasswordValidationError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PasswordValidationError::MissingDigit);
    }

    if errors.is_empty() {
        Ok(())
    }
    else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("TestPassword123".to_string());
        let hash = hash_password(&password).unwrap();
        assert!(verify_password(&password, &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_fails() {
        let password = SecretString::from("CorrectPassword1".to_string());
        let wrong = SecretString::from("WrongPassword1".to_string());
        let hash = hash_password(&password).unwrap();
        assert!(matches!(
            verify_password(&wrong, &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let password = SecretString::from("TestPassword123".to_string());
        let a = hash_password(&password).unwrap();
        let b = hash_password(&password).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_format_error() {
        let password = SecretString::from("TestPassword123".to_string());
        for bad in ["", "no-separator", "zzzz:zzzz", "abcd:1234"] {
            assert!(matches!(
                verify_password(&password, bad),
                Err(PasswordError::InvalidHashFormat)
            ));
        }
    }

    #[test]
    fn test_strength_collects_all_violations() {
        let errors = validate_password_strength("abc").unwrap_err();
        assert!(errors.contains(&PasswordValidationError::TooShort));
        assert!(errors.contains(&PasswordValidationError::MissingUppercase));
        assert!(errors.contains(&PasswordValidationError::MissingDigit));
        assert!(!errors.contains(&PasswordValidationError::MissingLowercase));
    }

    #[test]
    fn test_strength_accepts_valid_password() {
        assert!(validate_password_strength("Abcdefg1").is_ok());
    }
}
