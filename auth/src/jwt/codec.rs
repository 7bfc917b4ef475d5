use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::SessionClaims;
use super::errors::TokenError;
use super::handler::JwtHandler;
use super::TokenSigner;

/// Issues and validates time-bound session tokens.
///
/// Stateless: every method takes `&self` and touches no shared mutable
/// state, so one instance can serve any number of concurrent requests.
pub struct SessionCodec<S: TokenSigner = JwtHandler> {
    signer: S,
    lifetime: Duration,
}

impl SessionCodec<JwtHandler> {
    /// Codec signing HS256 tokens with `secret`.
    pub fn hs256(secret: &[u8], lifetime: Duration) -> Self {
        Self::new(JwtHandler::new(secret), lifetime)
    }
}

impl<S: TokenSigner> SessionCodec<S> {
    pub fn new(signer: S, lifetime: Duration) -> Self {
        Self { signer, lifetime }
    }

    /// Session lifetime applied to every issued token.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for the given subject, valid from now for one lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed, or the lifetime overflows the clock
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, username, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims::new(user_id, username, issued_at, self.lifetime)?;
        self.signer.sign(&claims)
    }

    /// Validate a token against the signer and the current time.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed
    /// * `UnsupportedAlgorithm` - Token was not signed with the expected algorithm
    /// * `BadSignature` - Signature does not verify
    /// * `Expired` - `now >= exp`
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Same as [`SessionCodec::validate`] with an explicit clock.
    ///
    /// Expiry is checked here regardless of what the signer already enforced.
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, TokenError> {
        let claims = self.signer.verify(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn codec() -> SessionCodec {
        SessionCodec::hs256(SECRET, Duration::hours(24))
    }

    /// Swap the first character of the signature segment for a different one.
    fn tamper_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        format!("{}.{}", head, chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_issue_then_validate() {
        let codec = codec();

        let token = codec.issue(12, "alice").expect("Failed to issue token");
        let claims = codec.validate(&token).expect("Failed to validate token");

        assert_eq!(claims.user_id, 12);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_validate_after_expiry() {
        let codec = codec();
        let token = codec.issue(12, "alice").unwrap();

        let later = Utc::now() + Duration::hours(25);
        assert_eq!(codec.validate_at(&token, later), Err(TokenError::Expired));
    }

    #[test]
    fn test_validate_exactly_at_expiry() {
        let codec = codec();
        let issued_at = Utc::now();
        let token = codec.issue_at(12, "alice", issued_at).unwrap();

        let at_expiry = issued_at + Duration::hours(24);
        assert_eq!(
            codec.validate_at(&token, at_expiry),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_issued_in_the_past_is_expired() {
        let codec = codec();
        let token = codec
            .issue_at(12, "alice", Utc::now() - Duration::hours(48))
            .unwrap();

        assert_eq!(codec.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_signature() {
        let codec = codec();
        let token = codec.issue(12, "alice").unwrap();

        assert_eq!(
            codec.validate(&tamper_signature(&token)),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_tampered_claims() {
        let codec = codec();
        let token = codec.issue(12, "alice").unwrap();
        let other = codec.issue(13, "mallory").unwrap();

        // Claims from one token with the signature of another.
        let (header_and_claims, _) = other.rsplit_once('.').unwrap();
        let (_, signature) = token.rsplit_once('.').unwrap();
        let forged = format!("{}.{}", header_and_claims, signature);

        assert_eq!(codec.validate(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_configured_lifetime() {
        let codec = SessionCodec::hs256(SECRET, Duration::hours(2));
        let token = codec.issue(1, "bob").unwrap();
        let claims = codec.validate(&token).unwrap();

        assert_eq!(codec.lifetime(), Duration::hours(2));
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
    }

    #[test]
    fn test_issue_with_overflowing_lifetime_fails() {
        let codec = SessionCodec::hs256(SECRET, Duration::days(1_000_000_000));

        assert!(matches!(
            codec.issue(1, "alice"),
            Err(TokenError::EncodingFailed(_))
        ));
    }
}
