//! SQLite auth token repository implementation.
//!
//! Implements `TokenRepository` from `parley-core`. Row ids are UUIDv7;
//! the token column stores the SHA-256 hash, never the plaintext. Expiry is
//! checked in the lookup itself so an expired token never resolves.

use std::time::Duration;

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use parley_core::account::repository::TokenRepository;
use parley_types::error::RepositoryError;
use parley_types::user::UserId;

use super::pool::DatabasePool;
use super::user::format_datetime;
use crate::crypto::token::{generate_token, hash_token};

/// SQLite-backed implementation of `TokenRepository`.
pub struct SqliteTokenRepository {
    pool: DatabasePool,
}

impl SqliteTokenRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl TokenRepository for SqliteTokenRepository {
    async fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, RepositoryError> {
        let token = generate_token();
        let now = Utc::now();
        let expires_at = now
            + chrono::Duration::from_std(ttl)
                .map_err(|e| RepositoryError::Query(format!("invalid ttl: {e}")))?;

        sqlx::query(
            r#"INSERT INTO auth_tokens (id, token_hash, user_id, created_at, expires_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(format_datetime(&now))
        .bind(format_datetime(&expires_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id FROM auth_tokens WHERE token_hash = ? AND expires_at > ?",
        )
        .bind(hash_token(token))
        .bind(format_datetime(&Utc::now()))
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_id: i64 = row
                    .try_get("user_id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_id))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::user::SqliteUserRepository;
    use parley_core::account::repository::UserRepository;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seed_user(pool: &DatabasePool) -> UserId {
        SqliteUserRepository::new(pool.clone())
            .create("ada", "Ada", "ada@example.com", "h")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteTokenRepository::new(pool);

        let token = repo.issue(user_id, Duration::from_secs(3600)).await.unwrap();
        assert!(token.starts_with("parley_"));

        let resolved = repo.resolve(&token).await.unwrap();
        assert_eq!(resolved, Some(user_id));
    }

    #[tokio::test]
    async fn test_unknown_token_does_not_resolve() {
        let pool = test_pool().await;
        seed_user(&pool).await;
        let repo = SqliteTokenRepository::new(pool);

        assert_eq!(repo.resolve("parley_bogus").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_token_does_not_resolve() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteTokenRepository::new(pool);

        let token = repo.issue(user_id, Duration::ZERO).await.unwrap();
        assert_eq!(repo.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_plaintext_never_stored() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteTokenRepository::new(pool.clone());

        let token = repo.issue(user_id, Duration::from_secs(3600)).await.unwrap();

        let stored: (String,) = sqlx::query_as("SELECT token_hash FROM auth_tokens LIMIT 1")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_ne!(stored.0, token);
        assert_eq!(stored.0, hash_token(&token));
    }
}
