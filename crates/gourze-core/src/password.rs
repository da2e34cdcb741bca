use std::sync::LazyLock;

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("gourze-unknown-account", DEFAULT_COST).ok());

/// Runs a full bcrypt verification against a fixed hash so a login for an
/// unknown account costs as much as one with a wrong password. Always
/// returns `false`.
pub fn verify_dummy_password(password: &str) -> bool {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify(password, dummy);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("root-password").unwrap();

        assert_ne!(hashed, "root-password");
        assert!(verify_password("root-password", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_dummy_verification_never_matches() {
        assert!(!verify_dummy_password("gourze-unknown-account"));
        assert!(!verify_dummy_password("password123"));
        assert!(DUMMY_HASH.is_some());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
