//! Publishes newly stored messages to matching waiters.

use std::sync::Arc;

use parley_types::message::Message;

use super::registry::WaitRegistry;

/// Resolves every waiter matched by a newly persisted message.
///
/// Cloning shares the underlying registry.
#[derive(Clone)]
pub struct Notifier {
    registry: Arc<WaitRegistry>,
}

impl Notifier {
    pub fn new(registry: Arc<WaitRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve all currently matching waiters with `[message]`.
    ///
    /// The message must already be persisted by the caller; this only
    /// touches the registry. Waiters concurrently removed by a timeout are
    /// simply not returned by the drain, so no waiter is resolved twice.
    pub fn publish(&self, message: &Message) {
        let matched = self.registry.drain_matching(message);
        if matched.is_empty() {
            return;
        }

        tracing::debug!(
            message_id = message.id,
            from = message.from_user_id,
            to = message.to_user_id,
            waiters = matched.len(),
            "resolving matched waiters"
        );

        // Resolution happens outside the registry lock. A single waiter
        // whose client already hung up must not stop the rest of the batch;
        // Waiter::resolve swallows the dropped-receiver case itself.
        for waiter in matched {
            waiter.resolve(vec![message.clone()]);
        }
    }
}
