//! Password hashing and the registration password policy
//!
//! Hashes are Argon2id PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Length bounds accepted at registration, in characters
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 72;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Password service handed to the auth service
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    /// Returns an error if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    /// Verify and map a mismatch to `InvalidCredentials`
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Registration policy: 8 to 72 characters with an uppercase letter,
/// a lowercase letter and a digit
///
/// # Errors
/// Returns a validation error naming the first failed requirement
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters long"
        )));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at most {PASSWORD_MAX_LEN} characters long"
        )));
    }

    let checks: [(fn(&char) -> bool, &str); 3] = [
        (char::is_ascii_uppercase, "an uppercase letter"),
        (char::is_ascii_lowercase, "a lowercase letter"),
        (char::is_ascii_digit, "a digit"),
    ];
    for (check, what) in checks {
        if !password.chars().any(|c| check(&c)) {
            return Err(AppError::Validation(format!(
                "Password must contain at least {what}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Festival2025").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, hash_password("Festival2025").unwrap());

        assert!(verify_password("Festival2025", &hash).unwrap());
        assert!(!verify_password("festival2025", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("x", "not-a-hash"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_verify_or_error() {
        let service = PasswordService::new();
        let hash = service.hash("Festival2025").unwrap();

        assert!(service.verify_or_error("Festival2025", &hash).is_ok());
        assert!(matches!(
            service.verify_or_error("wrong", &hash),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_strength_accepts_valid_passwords() {
        assert!(validate_password_strength("Abcdefg1").is_ok());
        assert!(validate_password_strength("JuggleFest2025!").is_ok());
        assert!(validate_password_strength(&format!("Aa1{}", "x".repeat(69))).is_ok());
    }

    #[test]
    fn test_strength_rejections() {
        for (password, fragment) in [
            ("Short1", "at least 8"),
            ("lowercase123", "uppercase"),
            ("UPPERCASE123", "lowercase"),
            ("NoDigitsHere", "digit"),
        ] {
            match validate_password_strength(password) {
                Err(AppError::Validation(msg)) => assert!(msg.contains(fragment), "{msg}"),
                other => panic!("expected validation error for {password}, got {other:?}"),
            }
        }

        let too_long = format!("Aa1{}", "x".repeat(70));
        assert!(validate_password_strength(&too_long).is_err());
    }
}
