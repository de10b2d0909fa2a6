use thiserror::Error;

/// Failure of the principal store while resolving a token subject
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Principal store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of the credential store while checking a password
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored password hash is unreadable: {0}")]
    CorruptHash(String),
}

/// Top-level error for login, refresh, and request authentication
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // Client-facing rejections (uniform, never say why)
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    // Server-side failures
    #[error("Principal lookup failed: {0}")]
    PrincipalLookup(#[from] LookupError),

    #[error("Credential check failed: {0}")]
    CredentialStore(#[from] CredentialStoreError),

    #[error("Token issuance failed: {0}")]
    TokenIssue(#[from] auth::IssueError),
}
