//! Chat service: message exchange and the long-poll suspension point.
//!
//! `ChatService` owns the long-poll engine. Sending a message inserts it
//! through the repository, then publishes the stored row to the wait
//! registry. Fetching a conversation returns stored messages immediately
//! when any exist (or when no `since` cursor is given); otherwise the
//! request suspends as a waiter until the notifier or the timeout
//! supervisor resolves it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parley_types::error::ChatError;
use parley_types::message::{ChatSummary, Message};
use parley_types::user::UserId;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::chat::repository::MessageRepository;
use crate::longpoll::{Notifier, TimeoutSupervisor, WaitRegistry};

/// Orchestrates message persistence and long-poll notification.
///
/// Generic over `MessageRepository` to keep parley-core free of
/// infrastructure dependencies.
pub struct ChatService<M: MessageRepository> {
    repo: M,
    registry: Arc<WaitRegistry>,
    notifier: Notifier,
    supervisor: TimeoutSupervisor,
}

impl<M: MessageRepository> ChatService<M> {
    /// Create a chat service with a fresh wait registry.
    ///
    /// `poll_window` bounds how long a long-poll request stays open when no
    /// message arrives.
    pub fn new(repo: M, poll_window: Duration) -> Self {
        let registry = Arc::new(WaitRegistry::new());
        Self {
            repo,
            notifier: Notifier::new(Arc::clone(&registry)),
            supervisor: TimeoutSupervisor::new(Arc::clone(&registry), poll_window),
            registry,
        }
    }

    /// Number of long-poll requests currently suspended.
    pub fn pending_waiters(&self) -> usize {
        self.registry.len()
    }

    /// Store a message and notify matching waiters.
    ///
    /// The message is durable before any waiter sees it. A store failure
    /// surfaces as an error and leaves the registry untouched.
    pub async fn send_message(
        &self,
        from: UserId,
        to: UserId,
        content: &str,
    ) -> Result<Message, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyContent);
        }
        if from == to {
            return Err(ChatError::SelfAddressed);
        }

        let message = self.repo.insert(from, to, content).await?;
        tracing::info!(
            message_id = message.id,
            from,
            to,
            "message stored"
        );

        self.notifier.publish(&message);
        Ok(message)
    }

    /// Fetch the conversation between `me` and `other`.
    ///
    /// Returns immediately when the store has results or `since` is absent.
    /// Otherwise suspends as a waiter filtered on `other` until a matching
    /// message is published or the poll window expires (empty result).
    pub async fn fetch_conversation(
        &self,
        me: UserId,
        other: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>, ChatError> {
        let messages = self.repo.query_between(me, other, since).await?;
        if !messages.is_empty() || since.is_none() {
            return Ok(messages);
        }

        Ok(self.wait_for_messages(me, Some(other)).await)
    }

    /// Conversation summaries for the user, newest first.
    pub async fn list_chats(&self, me: UserId) -> Result<Vec<ChatSummary>, ChatError> {
        Ok(self.repo.list_chats(me).await?)
    }

    /// Register a waiter, arm its deadline, and suspend until resolution.
    ///
    /// Exactly one of {notifier, supervisor} resolves the waiter; both paths
    /// go through registry removal, so the one-shot fires at most once and
    /// the armed deadline guarantees it fires at least once.
    async fn wait_for_messages(&self, me: UserId, counterpart: Option<UserId>) -> Vec<Message> {
        let (tx, rx) = oneshot::channel();
        let disarm = CancellationToken::new();
        let handle = self.registry.register(me, counterpart, tx, disarm.clone());
        self.supervisor.arm(handle, disarm);

        // The sender lives in the registry until a resolution path claims
        // it, so a recv error means the process is shutting down; treat it
        // as "no new messages".
        rx.await.unwrap_or_default()
    }
}
