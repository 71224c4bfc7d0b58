//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECT and
//! writer for mutations.

use chrono::{DateTime, Utc};
use sqlx::Row;

use parley_core::account::repository::UserRepository;
use parley_types::error::RepositoryError;
use parley_types::user::{ProfileUpdate, User, UserId, UserSummary};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: i64,
    username: String,
    fullname: String,
    email: String,
    avatar: Option<String>,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            fullname: row.try_get("fullname")?,
            email: row.try_get("email")?,
            avatar: row.try_get("avatar")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: self.id,
            username: self.username,
            fullname: self.fullname,
            email: self.email,
            avatar: self.avatar,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl SqliteUserRepository {
    async fn fetch_one(&self, id: UserId) -> Result<User, RepositoryError> {
        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(
        &self,
        username: &str,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"INSERT INTO users (username, fullname, email, password_hash, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(username)
        .bind(fullname)
        .bind(email)
        .bind(password_hash)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict("username or email taken".to_string())
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            fullname: fullname.to_string(),
            email: email.to_string(),
            avatar: None,
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ? OR email = ? LIMIT 1")
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        // Avatar only changes when a new path is supplied.
        let result = if let Some(avatar) = &update.avatar {
            sqlx::query(
                "UPDATE users SET username = ?, fullname = ?, email = ?, avatar = ? WHERE id = ?",
            )
            .bind(&update.username)
            .bind(&update.fullname)
            .bind(&update.email)
            .bind(avatar)
            .bind(id)
            .execute(&self.pool.writer)
            .await
        } else {
            sqlx::query("UPDATE users SET username = ?, fullname = ?, email = ? WHERE id = ?")
                .bind(&update.username)
                .bind(&update.fullname)
                .bind(&update.email)
                .bind(id)
                .execute(&self.pool.writer)
                .await
        }
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict("username or email taken".to_string())
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.fetch_one(id).await
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        exclude: UserId,
        limit: i64,
    ) -> Result<Vec<UserSummary>, RepositoryError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(
            r#"SELECT id, username, fullname FROM users
               WHERE (username LIKE ? OR fullname LIKE ?) AND id != ?
               ORDER BY username LIMIT ?"#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            summaries.push(UserSummary {
                id: row
                    .try_get("id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                username: row
                    .try_get("username")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                fullname: row
                    .try_get("fullname")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
            });
        }

        Ok(summaries)
    }
}
