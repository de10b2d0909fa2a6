use std::fmt;

use thiserror::Error;

/// Error raised when the signing secret cannot be used.
///
/// Always fatal: a service must refuse to start rather than sign tokens
/// with a weak or missing key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Signing secret is missing")]
    Missing,

    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Symmetric HMAC-SHA256 signing secret.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub const MIN_LENGTH: usize = 32;

    /// Validate and wrap a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Raw secret bytes
    ///
    /// # Returns
    /// SigningKey holding a copy of the secret
    ///
    /// # Errors
    /// * `Missing` - Secret is empty
    /// * `TooShort` - Secret is shorter than 32 bytes
    pub fn new(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::Missing);
        }

        if secret.len() < Self::MIN_LENGTH {
            return Err(KeyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: secret.len(),
            });
        }

        Ok(Self(secret.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Never print secret material.
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey")
            .field(&format_args!("{} bytes", self.0.len()))
            .finish()
    }
}
