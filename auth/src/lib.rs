//! Stateless token authentication library
//!
//! Framework-free building blocks shared by services:
//! - Signing key validation
//! - Signed, time-bounded tokens (HS256 JWT) with access/refresh classes
//! - Token pair issuance with configured lifetimes
//! - Password hashing (Argon2id)
//!
//! Services define their own ports (principal lookup, credential store) and
//! adapt these implementations behind them.
//!
//! # Examples
//!
//! ## Tokens
//! ```
//! use auth::{SigningKey, TokenCodec, TokenKind};
//! use chrono::Duration;
//!
//! let key = SigningKey::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let codec = TokenCodec::new(&key);
//! let token = codec.issue("alice", TokenKind::Access, Duration::minutes(15)).unwrap();
//! assert_eq!(codec.extract_subject(&token).unwrap(), "alice");
//! ```
//!
//! ## Login flow
//! ```
//! use auth::{Authenticator, PasswordHasher, SigningKey};
//!
//! let hasher = PasswordHasher::new();
//! let stored = hasher.hash("password123").unwrap();
//!
//! let key = SigningKey::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let authenticator = Authenticator::new(&key);
//!
//! if hasher.verify("password123", &stored).unwrap() {
//!     let tokens = authenticator.issue_tokens("alice").unwrap();
//!     let claims = authenticator.validate_token(&tokens.access_token).unwrap();
//!     assert_eq!(claims.sub, "alice");
//! }
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod key;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::IssuedTokens;
pub use authenticator::TokenLifetimes;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::IssueError;
pub use jwt::TokenCodec;
pub use jwt::TokenKind;
pub use jwt::VerifyError;
pub use key::KeyError;
pub use key::SigningKey;
pub use password::PasswordError;
pub use password::PasswordHasher;
