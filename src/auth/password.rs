//! Password hashing and policy
//!
//! Argon2 with a per-hash salt; verification goes through the crate's
//! constant-time comparison.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::utils::AppError;

/// Minimum password length at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password with a fresh salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::internal(format!("Stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Registration policy: minimum length only
pub fn validate_registration_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password.len() > crate::utils::validation::MAX_PASSWORD_LEN {
        return Err(AppError::validation("password is too long"));
    }
    Ok(())
}

/// Password-change policy: minimum length plus at least one digit and one
/// special character
pub fn validate_new_password(password: &str) -> Result<(), AppError> {
    validate_registration_password(password)?;

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "password must contain at least one digit",
        ));
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(AppError::validation(
            "password must contain at least one special character",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).expect("verify"));
        assert!(!verify_password("wrong password", &hash).expect("verify"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").expect("hash");
        let b = hash_password("same password").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn test_registration_policy() {
        assert!(validate_registration_password("short").is_err());
        assert!(validate_registration_password("longenough").is_ok());
    }

    #[test]
    fn test_change_policy_requires_digit_and_special() {
        assert!(validate_new_password("lettersonly").is_err());
        assert!(validate_new_password("letters123").is_err());
        assert!(validate_new_password("letters!!!").is_err());
        assert!(validate_new_password("letters123!").is_ok());
    }
}
