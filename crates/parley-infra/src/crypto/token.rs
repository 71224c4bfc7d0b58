//! Opaque bearer token generation and at-rest hashing.
//!
//! Tokens are 32 random bytes rendered as `parley_<hex>`. Only the SHA-256
//! hash is stored; the plaintext exists exactly once, in the issuance
//! response.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Generate a fresh bearer token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("parley_{hex}")
}

/// Compute the SHA-256 hash of a token (lowercase hex), as stored.
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_prefixed_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert!(a.starts_with("parley_"));
        assert_eq!(a.len(), "parley_".len() + 64);
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_stable_hex() {
        let h1 = hash_token("parley_abc");
        let h2 = hash_token("parley_abc");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(h1, hash_token("parley_abd"));
    }
}
