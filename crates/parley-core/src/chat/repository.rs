//! MessageRepository trait definition.
//!
//! The durable, ordered store of 1-to-1 messages. Implementations live in
//! parley-infra (e.g. `SqliteMessageRepository`). Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use chrono::{DateTime, Utc};
use parley_types::error::RepositoryError;
use parley_types::message::{ChatSummary, Message};
use parley_types::user::UserId;

/// Repository trait for message persistence and conversation queries.
pub trait MessageRepository: Send + Sync {
    /// Insert a message and return the stored row (id and timestamp are
    /// assigned by the store).
    fn insert(
        &self,
        from_user_id: UserId,
        to_user_id: UserId,
        content: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Messages exchanged between `a` and `b` in either direction, strictly
    /// newer than `since` when given, ordered by timestamp ascending.
    fn query_between(
        &self,
        a: UserId,
        b: UserId,
        since: Option<DateTime<Utc>>,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// One summary per counterpart the user has exchanged messages with,
    /// carrying the latest message, newest conversation first.
    fn list_chats(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSummary>, RepositoryError>> + Send;
}
