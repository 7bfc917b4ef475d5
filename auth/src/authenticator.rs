use std::sync::Arc;

use chrono::Duration;

use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::jwt::SessionCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenSigner;
use crate::revocation::RevocationRegistry;

/// Authentication gate combining session tokens and revocation.
///
/// One instance per process, shared behind an `Arc`. The codec lifetime and
/// the registry retention come from the same value so they cannot drift.
pub struct Authenticator<S: TokenSigner = JwtHandler> {
    codec: SessionCodec<S>,
    registry: Arc<RevocationRegistry>,
}

/// Subject of a successfully authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Missing authorization token")]
    MissingToken,

    #[error("Token has been revoked")]
    Revoked,

    #[error("Invalid token: {0}")]
    Invalid(#[from] TokenError),
}

impl Authenticator<JwtHandler> {
    /// Create an authenticator signing HS256 tokens.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `session_lifetime` - Token validity, also the revocation retention
    pub fn new(jwt_secret: &[u8], session_lifetime: Duration) -> Self {
        Self::with_signer(JwtHandler::new(jwt_secret), session_lifetime)
    }
}

impl<S: TokenSigner> Authenticator<S> {
    /// Create an authenticator around any token signer.
    pub fn with_signer(signer: S, session_lifetime: Duration) -> Self {
        Self {
            codec: SessionCodec::new(signer, session_lifetime),
            registry: Arc::new(RevocationRegistry::new(session_lifetime)),
        }
    }

    pub fn session_lifetime(&self) -> Duration {
        self.codec.lifetime()
    }

    /// Shared handle to the revocation registry.
    pub fn registry(&self) -> Arc<RevocationRegistry> {
        Arc::clone(&self.registry)
    }

    /// Issue a session token for an account.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.codec.issue(user_id, username)
    }

    /// Validate a token without consulting the revocation registry.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.codec.validate(token)
    }

    /// Authorize one request.
    ///
    /// Checks run in a fixed order: presence, revocation, then signature and
    /// expiry. A revoked token is reported as `Revoked` even if it would also
    /// fail validation.
    ///
    /// # Errors
    /// * `MissingToken` - No token, or an empty one
    /// * `Revoked` - Token was explicitly revoked
    /// * `Invalid` - Token failed validation
    pub fn authenticate(&self, token: Option<&str>) -> Result<Identity, AuthenticationError> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthenticationError::MissingToken),
        };

        if self.registry.is_revoked(token) {
            return Err(AuthenticationError::Revoked);
        }

        let claims = self.codec.validate(token)?;

        Ok(claims.into())
    }

    /// Revoke a token so it no longer authenticates.
    pub fn revoke(&self, token: &str) {
        self.registry.revoke(token);
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.registry.is_revoked(token)
    }
}
