//! Authentication core
//!
//! - Password hashing (Argon2id) behind the [`PasswordHashing`] capability
//! - Session tokens (HS256 JWT) behind the [`TokenSigner`] capability
//! - Process-local token revocation
//! - The authentication gate tying tokens and revocation together
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{PasswordHasher, PasswordHashing};
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("secret1").unwrap();
//! assert!(hasher.verify("secret1", &hash).unwrap());
//! assert!(!hasher.verify("wrongpass", &hash).unwrap());
//! ```
//!
//! ## Session Flow
//! ```
//! use auth::{AuthenticationError, Authenticator};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//!
//! let token = auth.issue_token(1, "alice").unwrap();
//! let identity = auth.authenticate(Some(&token)).unwrap();
//! assert_eq!(identity.username, "alice");
//!
//! auth.revoke(&token);
//! assert_eq!(auth.authenticate(Some(&token)), Err(AuthenticationError::Revoked));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod revocation;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::Identity;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use jwt::SessionCodec;
pub use jwt::TokenError;
pub use jwt::TokenSigner;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordHashing;
pub use revocation::RevocationRegistry;
