use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Token class carried in the signed `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims encoded in every issued token.
///
/// Flat payload of `sub`, `iat`, `exp` (Unix timestamps in seconds) and the
/// token class. `exp` is always derived from `iat` plus a fixed lifetime at
/// issuance time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token class
    pub typ: TokenKind,
}

impl Claims {
    /// Check if the token is expired at the given instant.
    ///
    /// A token is expired from the exact second of `exp` onward.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }

    /// Lifetime in seconds the token was issued with.
    pub fn lifetime_secs(&self) -> i64 {
        self.exp - self.iat
    }
}
