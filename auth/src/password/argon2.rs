use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Hash verified when the account does not exist, so that the lookup costs
/// the same whether or not the identifier is known.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Argon2id password hashing with PHC string output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password against an optional stored hash.
    ///
    /// When no hash is stored (unknown account) a dummy hash is verified
    /// instead and the result is always `false`.
    pub fn verify_stored(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<bool, PasswordError> {
        match stored_hash {
            Some(hash) => self.verify(password, hash),
            None => {
                let dummy = DUMMY_HASH.get_or_init(|| self.hash("dummy-password").ok());
                if let Some(dummy) = dummy {
                    let _ = self.verify(password, dummy);
                }
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "correct horse battery staple";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher.verify(password, &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("pass_word!").unwrap();
        let second = hasher.hash("pass_word!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }

    #[test]
    fn test_verify_stored_without_hash_is_false() {
        let hasher = PasswordHasher::new();

        assert!(!hasher.verify_stored("dummy-password", None).unwrap());
        assert!(!hasher.verify_stored("anything", None).unwrap());
    }

    #[test]
    fn test_verify_stored_with_hash() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("pass_word!").unwrap();

        assert!(hasher.verify_stored("pass_word!", Some(&hash)).unwrap());
        assert!(!hasher.verify_stored("nope", Some(&hash)).unwrap());
    }
}
