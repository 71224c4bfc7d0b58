//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `parley-core`. Conversation queries
//! scan both directions of the user pair; RFC 3339 timestamp strings compare
//! correctly as text, so the `since` cursor is a plain `>` on the column.

use chrono::{DateTime, Utc};
use sqlx::Row;

use parley_core::chat::repository::MessageRepository;
use parley_types::error::RepositoryError;
use parley_types::message::{ChatSummary, Message};
use parley_types::user::UserId;

use super::pool::DatabasePool;
use super::user::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: i64,
    from_user_id: i64,
    to_user_id: i64,
    content: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            from_user_id: row.try_get("from_user_id")?,
            to_user_id: row.try_get("to_user_id")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: self.id,
            from_user_id: self.from_user_id,
            to_user_id: self.to_user_id,
            content: self.content,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn insert(
        &self,
        from_user_id: UserId,
        to_user_id: UserId,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let timestamp = Utc::now();
        let result = sqlx::query(
            r#"INSERT INTO messages (from_user_id, to_user_id, content, timestamp)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(content)
        .bind(format_datetime(&timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Message {
            id: result.last_insert_rowid(),
            from_user_id,
            to_user_id,
            content: content.to_string(),
            timestamp,
        })
    }

    async fn query_between(
        &self,
        a: UserId,
        b: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut sql = String::from(
            r#"SELECT id, from_user_id, to_user_id, content, timestamp FROM messages
               WHERE ((from_user_id = ?1 AND to_user_id = ?2)
                   OR (from_user_id = ?2 AND to_user_id = ?1))"#,
        );
        if since.is_some() {
            sql.push_str(" AND timestamp > ?3");
        }
        sql.push_str(" ORDER BY timestamp ASC, id ASC");

        let mut query = sqlx::query(&sql).bind(a).bind(b);
        if let Some(since) = since {
            query = query.bind(format_datetime(&since));
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn list_chats(&self, user_id: UserId) -> Result<Vec<ChatSummary>, RepositoryError> {
        // Latest message per counterpart via a correlated subquery (SQLite
        // has no DISTINCT ON).
        let rows = sqlx::query(
            r#"SELECT u.id, u.username, u.fullname, m.content AS last_message, m.timestamp AS date
               FROM users u
               JOIN messages m ON m.id = (
                   SELECT m2.id FROM messages m2
                   WHERE (m2.from_user_id = u.id AND m2.to_user_id = ?1)
                      OR (m2.from_user_id = ?1 AND m2.to_user_id = u.id)
                   ORDER BY m2.timestamp DESC, m2.id DESC
                   LIMIT 1
               )
               WHERE u.id != ?1
               ORDER BY date DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let date: String = row
                .try_get("date")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            chats.push(ChatSummary {
                id: row
                    .try_get("id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                username: row
                    .try_get("username")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                fullname: row
                    .try_get("fullname")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                last_message: row
                    .try_get("last_message")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                date: parse_datetime(&date)?,
            });
        }

        Ok(chats)
    }
}
