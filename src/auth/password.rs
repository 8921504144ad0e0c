use crate::error::AppError;
use bcrypt::{hash, verify};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // $2b$12$ followed by a 22-char salt and a 31-char digest.
    static ref BCRYPT_HASH: Regex = Regex::new(r"^\$2[abxy]\$\d{2}\$[./A-Za-z0-9]{53}$").unwrap();
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Stored credentials written before hashing was introduced (the demo seeds among
/// them) are plain text; those are compared directly. Only values with the full
/// bcrypt shape count as hashes, so a plain password such as `$2secret` still works.
pub fn is_hashed(stored: &str) -> bool {
    BCRYPT_HASH.is_match(stored)
}

pub fn verify_password(password: &str, stored: &str) -> Result<bool, AppError> {
    if !is_hashed(stored) {
        return Ok(password == stored);
    }
    verify(password, stored)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, 4).unwrap();

        assert!(is_hashed(&hashed));
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_plaintext_credentials_still_verify() {
        assert!(verify_password("password", "password").unwrap());
        assert!(!verify_password("Password", "password").unwrap());
    }

    #[test]
    fn test_plaintext_with_bcrypt_prefix_is_not_a_hash() {
        assert!(!is_hashed("$2secret"));
        assert!(!is_hashed("$2b$invalidhashformat"));
        assert!(verify_password("$2secret", "$2secret").unwrap());
        assert!(!verify_password("wrong", "$2secret").unwrap());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        // Malformed hashes fall through to a plain comparison and never match.
        assert!(!verify_password("test_password123", "$2b$invalidhashformat").unwrap());
    }
}
