pub mod claims;
pub mod codec;
pub mod errors;
pub mod handler;

pub use claims::SessionClaims;
pub use codec::SessionCodec;
pub use errors::TokenError;
pub use handler::JwtHandler;

/// Symmetric token signing capability.
///
/// `sign` turns claims into an opaque token; `verify` checks integrity and
/// hands the claims back. Expiry policy lives in [`SessionCodec`], not here.
pub trait TokenSigner: Send + Sync + 'static {
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError>;

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError>;
}
