use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::user::models::Role;
use crate::user::models::User;

/// Literal scheme prefix of a bearer `Authorization` header (case-sensitive).
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from a raw `Authorization` header value.
///
/// Returns `None` unless the value starts with exactly `"Bearer "`.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix(BEARER_PREFIX)
}

/// Authenticated identity and the authorities granted to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub identity: String,
    pub authorities: BTreeSet<Role>,
}

impl Principal {
    pub fn new(identity: impl Into<String>, authorities: BTreeSet<Role>) -> Self {
        Self {
            identity: identity.into(),
            authorities,
        }
    }

    pub fn has_authority(&self, role: &Role) -> bool {
        self.authorities.contains(role)
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.username.as_str(), user.roles.clone())
    }
}

/// Per-request authentication state.
///
/// Lives in the request extensions of exactly one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    pub principal: Principal,
    pub authenticated: bool,
}

impl SecurityContext {
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal,
            authenticated: true,
        }
    }
}

/// Login credentials as submitted by a client.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"***")
            .finish()
    }
}
