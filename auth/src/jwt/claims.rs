use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Identity and validity window carried inside a session token.
///
/// `iat` and `exp` are Unix timestamps in seconds, matching RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Account id of the subject
    pub user_id: i64,

    /// Username of the subject at issue time
    pub username: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims issued at `issued_at` and valid for `lifetime`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiration falls outside the representable range
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let expiration = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            TokenError::EncodingFailed("Session lifetime overflows the expiration time".to_string())
        })?;

        Ok(Self {
            user_id,
            username: username.into(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// A token is only valid while `now < exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
