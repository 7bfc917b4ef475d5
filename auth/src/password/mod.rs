pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use errors::PasswordError;

/// One-way password hashing capability.
///
/// Implementations must salt every hash and embed everything needed for
/// verification (algorithm, parameters, salt) in the returned digest.
pub trait PasswordHashing: Send + Sync + 'static {
    /// Hash a plaintext password into a self-describing digest.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a candidate password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`. Errors are reserved for digests that
    /// cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}
