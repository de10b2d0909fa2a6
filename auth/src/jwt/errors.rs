use thiserror::Error;

use super::claims::TokenKind;

/// Error type for token issuance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueError {
    #[error("Token subject must not be empty")]
    EmptySubject,

    #[error("Token lifetime must be at least one second, got {0}s")]
    InvalidLifetime(i64),

    #[error("Failed to encode token: {0}")]
    Encoding(String),
}

/// Reason a presented token was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Expected {expected} token, got {actual} token")]
    WrongTokenType {
        expected: TokenKind,
        actual: TokenKind,
    },
}
