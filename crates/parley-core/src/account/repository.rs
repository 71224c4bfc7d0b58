//! UserRepository and TokenRepository trait definitions.
//!
//! Implementations live in parley-infra. Uses native async fn in traits
//! (RPITIT, Rust 2024 edition), same pattern as `MessageRepository`.

use std::time::Duration;

use parley_types::error::RepositoryError;
use parley_types::user::{ProfileUpdate, User, UserId, UserSummary};

/// Repository trait for user account persistence.
pub trait UserRepository: Send + Sync {
    /// Create a new account and return the stored row.
    fn create(
        &self,
        username: &str,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Whether any account already holds the username or the email.
    fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Apply a profile update and return the updated row.
    fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Substring search over username and fullname, excluding the searcher,
    /// at most `limit` results.
    fn search(
        &self,
        query: &str,
        exclude: UserId,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<UserSummary>, RepositoryError>> + Send;
}

/// Repository trait for opaque auth tokens.
///
/// Tokens are bearer secrets: the plaintext is returned exactly once at
/// issuance and only a hash is stored.
pub trait TokenRepository: Send + Sync {
    /// Issue a fresh token for the user, valid for `ttl`.
    fn issue(
        &self,
        user_id: UserId,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<String, RepositoryError>> + Send;

    /// Resolve a presented token to its user. Expired or unknown tokens
    /// resolve to `None`.
    fn resolve(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserId>, RepositoryError>> + Send;
}
