//! PasswordHasher trait definition.
//!
//! The concrete Argon2id implementation lives in parley-infra; the service
//! only needs hash-and-verify.

use parley_types::error::AccountError;

/// One-way password hashing with salted verification.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, AccountError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for malformed hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AccountError>;
}
