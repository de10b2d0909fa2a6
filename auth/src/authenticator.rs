use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::jwt::Claims;
use crate::jwt::IssueError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenKind;
use crate::jwt::VerifyError;
use crate::key::SigningKey;

/// Lifetimes applied to each token class at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
        }
    }
}

/// Tokens handed to a client after a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    /// Short-lived bearer token for API calls
    pub access_token: String,

    /// Long-lived token exchangeable for new access tokens (when enabled)
    pub refresh_token: Option<String>,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Token issuance coordinator.
///
/// Wraps a [`TokenCodec`] with the configured lifetimes so callers never
/// choose expiry times themselves.
pub struct Authenticator {
    codec: TokenCodec,
    lifetimes: TokenLifetimes,
    refresh_enabled: bool,
}

impl Authenticator {
    /// Create a new authenticator with default lifetimes and refresh enabled.
    ///
    /// # Arguments
    /// * `key` - Validated signing secret
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(key: &SigningKey) -> Self {
        Self::from_codec(TokenCodec::new(key))
    }

    /// Create an authenticator whose codec reads time from `clock`.
    pub fn with_clock(key: &SigningKey, clock: Arc<dyn Clock>) -> Self {
        Self::from_codec(TokenCodec::with_clock(key, clock))
    }

    fn from_codec(codec: TokenCodec) -> Self {
        Self {
            codec,
            lifetimes: TokenLifetimes::default(),
            refresh_enabled: true,
        }
    }

    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    pub fn with_refresh_enabled(mut self, enabled: bool) -> Self {
        self.refresh_enabled = enabled;
        self
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    pub fn refresh_enabled(&self) -> bool {
        self.refresh_enabled
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issue the tokens returned at login.
    ///
    /// Always issues an access token; a refresh token is added when the
    /// refresh flow is enabled.
    ///
    /// # Errors
    /// * `IssueError` - Token generation failed
    pub fn issue_tokens(&self, subject: &str) -> Result<IssuedTokens, IssueError> {
        let mut tokens = self.issue_access_token(subject)?;

        if self.refresh_enabled {
            tokens.refresh_token = Some(self.codec.issue(
                subject,
                TokenKind::Refresh,
                self.lifetimes.refresh,
            )?);
        }

        Ok(tokens)
    }

    /// Issue a lone access token, e.g. in exchange for a refresh token.
    pub fn issue_access_token(&self, subject: &str) -> Result<IssuedTokens, IssueError> {
        let access_token = self
            .codec
            .issue(subject, TokenKind::Access, self.lifetimes.access)?;

        Ok(IssuedTokens {
            access_token,
            refresh_token: None,
            expires_in: self.lifetimes.access.num_seconds(),
        })
    }

    /// Validate an access token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, VerifyError> {
        self.codec.verify(token)
    }

    /// Validate a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, VerifyError> {
        self.codec.verify_kind(token, TokenKind::Refresh)
    }
}
