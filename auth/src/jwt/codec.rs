use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::IssueError;
use super::errors::VerifyError;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::key::SigningKey;

/// Issues and verifies signed, time-bounded tokens.
///
/// Tokens are compact JWS strings signed with HS256. Expiry is checked against
/// the injected [`Clock`] with no leeway, and issuer/audience are never
/// validated. The codec holds no mutable state and can be shared freely.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec reading time from the system clock.
    pub fn new(key: &SigningKey) -> Self {
        Self::with_clock(key, Arc::new(SystemClock))
    }

    /// Create a codec with an explicit time source.
    ///
    /// # Arguments
    /// * `key` - Validated signing secret
    /// * `clock` - Time source used for `iat`, `exp` and expiry checks
    pub fn with_clock(key: &SigningKey, clock: Arc<dyn Clock>) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        // Expiry is checked against our own clock after decoding.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            algorithm,
            validation,
            clock,
        }
    }

    /// Issue a signed token for `subject`.
    ///
    /// # Arguments
    /// * `subject` - Identity the token asserts (non-empty)
    /// * `kind` - Token class stored in the `typ` claim
    /// * `lifetime` - Validity period, at least one second
    ///
    /// # Returns
    /// Compact `header.payload.signature` token string
    ///
    /// # Errors
    /// * `EmptySubject` - Subject is empty
    /// * `InvalidLifetime` - Lifetime shorter than one second
    /// * `Encoding` - Serialization or signing failed
    pub fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        lifetime: Duration,
    ) -> Result<String, IssueError> {
        if subject.is_empty() {
            return Err(IssueError::EmptySubject);
        }

        let lifetime_secs = lifetime.num_seconds();
        if lifetime_secs < 1 {
            return Err(IssueError::InvalidLifetime(lifetime_secs));
        }

        let issued_at = self.clock.now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + lifetime_secs,
            typ: kind,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| IssueError::Encoding(e.to_string()))
    }

    /// Verify an access token.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed
    /// * `BadSignature` - Signature does not match the signing key
    /// * `Expired` - `exp` is at or before the current time
    /// * `WrongTokenType` - Token is a refresh token
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        self.verify_kind(token, TokenKind::Access)
    }

    /// Verify a token of the given class.
    ///
    /// Checks structure and signature first, then expiry, then the class.
    pub fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, VerifyError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(&e))?
            .claims;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(VerifyError::Expired);
        }

        if claims.typ != expected {
            return Err(VerifyError::WrongTokenType {
                expected,
                actual: claims.typ,
            });
        }

        Ok(claims)
    }

    /// Verify an access token and return its subject.
    pub fn extract_subject(&self, token: &str) -> Result<String, VerifyError> {
        self.verify(token).map(|claims| claims.sub)
    }
}

/// Map a decode failure onto the caller-facing error.
///
/// A tampered signature that introduces a `.` changes the segment count and is
/// reported as `Malformed`, not `BadSignature`.
fn classify(error: &jsonwebtoken::errors::Error) -> VerifyError {
    match error.kind() {
        // A foreign algorithm in the header means the token was not signed by us.
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => VerifyError::BadSignature,
        ErrorKind::ExpiredSignature => VerifyError::Expired,
        _ => VerifyError::Malformed,
    }
}
