use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::claims::SessionClaims;
use super::errors::TokenError;
use super::TokenSigner;

/// JWT token handler for encoding and decoding tokens.
///
/// Signs with HS256 (HMAC with SHA-256) and accepts nothing else: the header
/// algorithm is checked before the signature so a token can never pick its
/// own verification scheme.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and verify a JWT token.
    ///
    /// Requires an `exp` claim and applies no leeway.
    ///
    /// # Errors
    /// * `Malformed` - Token structure, encoding or claims are invalid
    /// * `UnsupportedAlgorithm` - Header names an algorithm other than HS256
    /// * `BadSignature` - Signature does not match the secret
    /// * `Expired` - `exp` is in the past
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let header = decode_header(token).map_err(|e| {
            // jsonwebtoken cannot represent algorithms like `none`, so name
            // them from the raw header instead of calling the token malformed.
            match raw_algorithm(token) {
                Some(alg) if alg != "HS256" => TokenError::UnsupportedAlgorithm(alg),
                _ => TokenError::from(e),
            }
        })?;
        if header.alg != self.algorithm {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<T>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// The `alg` field of a token header, read without interpreting it.
fn raw_algorithm(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    let header: RawHeader = serde_json::from_slice(&bytes).ok()?;

    Some(header.alg)
}

impl TokenSigner for JwtHandler {
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        self.encode(claims)
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.decode(token)
    }
}
