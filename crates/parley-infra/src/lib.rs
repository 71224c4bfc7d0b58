//! Infrastructure implementations for Parley.
//!
//! SQLite repositories (sqlx, split reader/writer pool), Argon2 password
//! hashing, opaque token issuance, and the TOML config loader.

pub mod config;
pub mod crypto;
pub mod sqlite;
