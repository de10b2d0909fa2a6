use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::IssuedTokens;

use crate::authentication::errors::AuthError;
use crate::authentication::models::bearer_token;
use crate::authentication::models::Credentials;
use crate::authentication::models::SecurityContext;
use crate::authentication::ports::AuthServicePort;
use crate::authentication::ports::CredentialStore;
use crate::authentication::ports::PrincipalLookup;

/// Domain service for login, refresh, and per-request authentication.
///
/// Stateless apart from the shared collaborators; every call decides from
/// the token and the stores alone.
pub struct AuthService<PL, CS>
where
    PL: PrincipalLookup,
    CS: CredentialStore,
{
    principals: Arc<PL>,
    credentials: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<PL, CS> AuthService<PL, CS>
where
    PL: PrincipalLookup,
    CS: CredentialStore,
{
    pub fn new(principals: Arc<PL>, credentials: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            principals,
            credentials,
            authenticator,
        }
    }
}

#[async_trait]
impl<PL, CS> AuthServicePort for AuthService<PL, CS>
where
    PL: PrincipalLookup,
    CS: CredentialStore,
{
    async fn login(&self, credentials: Credentials) -> Result<IssuedTokens, AuthError> {
        let verified = self
            .credentials
            .verify(&credentials.identifier, &credentials.password)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Credential store failure during login");
                AuthError::from(e)
            })?;

        if !verified {
            tracing::info!(identifier = %credentials.identifier, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.authenticator.issue_tokens(&credentials.identifier)?;
        tracing::info!(
            identifier = %credentials.identifier,
            refresh_issued = tokens.refresh_token.is_some(),
            "Login succeeded"
        );

        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AuthError> {
        if !self.authenticator.refresh_enabled() {
            tracing::debug!("Refresh requested while disabled");
            return Err(AuthError::InvalidRefreshToken);
        }

        let claims = self
            .authenticator
            .validate_refresh_token(refresh_token)
            .map_err(|reason| {
                tracing::debug!(%reason, "Refresh token rejected");
                AuthError::InvalidRefreshToken
            })?;

        let principal = self.principals.lookup(&claims.sub).await.map_err(|e| {
            tracing::error!(error = %e, "Principal lookup failed during refresh");
            AuthError::from(e)
        })?;

        match principal {
            Some(principal) => {
                let tokens = self.authenticator.issue_access_token(&principal.identity)?;
                tracing::info!(identity = %principal.identity, "Access token refreshed");
                Ok(tokens)
            }
            None => {
                tracing::debug!(subject = %claims.sub, "Refresh subject no longer resolves");
                Err(AuthError::InvalidRefreshToken)
            }
        }
    }

    async fn resolve_security_context(
        &self,
        authorization: Option<&str>,
    ) -> Result<Option<SecurityContext>, AuthError> {
        let Some(token) = authorization.and_then(bearer_token) else {
            return Ok(None);
        };

        let claims = match self.authenticator.validate_token(token) {
            Ok(claims) => claims,
            Err(reason) => {
                tracing::debug!(%reason, "Bearer token rejected");
                return Ok(None);
            }
        };

        match self.principals.lookup(&claims.sub).await {
            Ok(Some(principal)) => Ok(Some(SecurityContext::authenticated(principal))),
            Ok(None) => {
                tracing::debug!(subject = %claims.sub, "Token subject does not resolve");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, subject = %claims.sub, "Principal lookup failed");
                Err(e.into())
            }
        }
    }
}
