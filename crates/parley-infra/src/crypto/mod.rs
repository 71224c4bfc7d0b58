//! Credential material: password hashing and bearer token generation.

pub mod password;
pub mod token;

pub use password::Argon2PasswordHasher;
