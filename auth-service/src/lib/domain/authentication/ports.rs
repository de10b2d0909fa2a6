use async_trait::async_trait;
use auth::IssuedTokens;

use crate::authentication::errors::AuthError;
use crate::authentication::errors::CredentialStoreError;
use crate::authentication::errors::LookupError;
use crate::authentication::models::Credentials;
use crate::authentication::models::Principal;
use crate::authentication::models::SecurityContext;

/// Port for authentication operations driven by the HTTP layer.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown account, wrong password, or disabled account
    /// * `CredentialStore` - Credential store failed
    /// * `TokenIssue` - Token could not be signed
    async fn login(&self, credentials: Credentials) -> Result<IssuedTokens, AuthError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Refresh disabled, token rejected, or subject gone
    /// * `PrincipalLookup` - Principal store failed
    /// * `TokenIssue` - Token could not be signed
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AuthError>;

    /// Decide the security context for a request from its raw `Authorization` header.
    ///
    /// # Returns
    /// `Some` context when the bearer token verifies and its subject resolves,
    /// `None` otherwise (the request continues anonymously)
    ///
    /// # Errors
    /// * `PrincipalLookup` - Principal store failed
    async fn resolve_security_context(
        &self,
        authorization: Option<&str>,
    ) -> Result<Option<SecurityContext>, AuthError>;
}

/// Resolves a token subject to the principal it names.
#[async_trait]
pub trait PrincipalLookup: Send + Sync + 'static {
    /// # Returns
    /// `None` when the identity is unknown or the account is disabled
    async fn lookup(&self, identity: &str) -> Result<Option<Principal>, LookupError>;
}

/// Checks a plaintext password against the stored hash for an identifier.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// # Returns
    /// `true` only for an enabled account whose stored hash matches
    async fn verify(&self, identifier: &str, password: &str)
        -> Result<bool, CredentialStoreError>;
}
