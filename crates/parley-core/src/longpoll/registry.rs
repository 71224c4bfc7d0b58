//! Registry of outstanding long-poll requests.
//!
//! Each suspended request is a [`Waiter`]: the waiting user, an optional
//! counterpart filter, and the one-shot channel that resumes the suspended
//! handler. The registry owns every waiter from registration until it is
//! removed -- by a matching publish or by the timeout supervisor -- and a
//! removed waiter is never reinserted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parley_types::message::Message;
use parley_types::user::UserId;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Pending-set size at which registry growth is logged. Waiters are bounded
/// in time by the supervisor, so sustained growth past this means the
/// timeout window is too long for the request rate.
const GROWTH_WARN_THRESHOLD: usize = 1024;

/// A suspended long-poll request awaiting a new chat message.
pub struct Waiter {
    id: u64,
    user_id: UserId,
    counterpart: Option<UserId>,
    tx: oneshot::Sender<Vec<Message>>,
    /// Disarms the supervisor's deadline task when the waiter is resolved
    /// by a match, so no orphaned timer outlives it.
    disarm: CancellationToken,
    pub registered_at: DateTime<Utc>,
}

impl Waiter {
    /// Whether `message` satisfies this waiter.
    ///
    /// True when the message is addressed to the waiting user from the
    /// expected counterpart (or from anyone, if no counterpart is set), or
    /// when the waiting user themself sent it to the expected counterpart --
    /// a conversation view cares about both directions.
    pub fn matches(&self, message: &Message) -> bool {
        let to_me = self.user_id == message.to_user_id
            && self
                .counterpart
                .is_none_or(|other| other == message.from_user_id);
        let from_me = self.user_id == message.from_user_id
            && self.counterpart == Some(message.to_user_id);
        to_me || from_me
    }

    /// Terminal one-shot transition: disarm the timeout and resume the
    /// suspended request with `messages`.
    ///
    /// Consumes the waiter, so resolving twice is unrepresentable. A dropped
    /// receiver (client hung up) is logged and otherwise ignored; it must
    /// never affect other waiters resolved in the same batch.
    pub fn resolve(self, messages: Vec<Message>) {
        self.disarm.cancel();
        if self.tx.send(messages).is_err() {
            tracing::debug!(
                waiter_id = self.id,
                user_id = self.user_id,
                "waiter receiver dropped before resolution"
            );
        }
    }
}

impl std::fmt::Debug for Waiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waiter")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("counterpart", &self.counterpart)
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// Handle to a registered waiter, usable for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterHandle(u64);

/// The live set of outstanding long-poll requests.
///
/// All three operations take the same lock; each is atomic with respect to
/// the others. Critical sections only touch the map -- resolution happens
/// outside the lock, on waiters already removed from the set.
pub struct WaitRegistry {
    pending: Mutex<HashMap<u64, Waiter>>,
    next_id: AtomicU64,
}

impl WaitRegistry {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new waiter. `disarm` is cancelled when the waiter is
    /// resolved by a match, releasing its deadline task early.
    pub fn register(
        &self,
        user_id: UserId,
        counterpart: Option<UserId>,
        tx: oneshot::Sender<Vec<Message>>,
        disarm: CancellationToken,
    ) -> WaiterHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let waiter = Waiter {
            id,
            user_id,
            counterpart,
            tx,
            disarm,
            registered_at: Utc::now(),
        };

        let mut pending = self.pending.lock().expect("wait registry poisoned");
        pending.insert(id, waiter);
        if pending.len() == GROWTH_WARN_THRESHOLD {
            tracing::warn!(
                pending = pending.len(),
                "wait registry reached growth threshold"
            );
        }
        WaiterHandle(id)
    }

    /// Remove a waiter if still present.
    ///
    /// `Some` transfers ownership of the one-shot resolution to the caller;
    /// `None` means another path (match or timeout) already won the race.
    /// Removing twice yields `Some` once, `None` after.
    pub fn remove(&self, handle: &WaiterHandle) -> Option<Waiter> {
        self.pending
            .lock()
            .expect("wait registry poisoned")
            .remove(&handle.0)
    }

    /// Atomically remove and return every waiter matching `message`.
    /// Non-matching waiters stay registered untouched.
    pub fn drain_matching(&self, message: &Message) -> Vec<Waiter> {
        let mut pending = self.pending.lock().expect("wait registry poisoned");
        let matched_ids: Vec<u64> = pending
            .iter()
            .filter(|(_, w)| w.matches(message))
            .map(|(id, _)| *id)
            .collect();
        matched_ids
            .into_iter()
            .filter_map(|id| pending.remove(&id))
            .collect()
    }

    /// Number of currently pending waiters.
    pub fn len(&self) -> usize {
        self.pending.lock().expect("wait registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WaitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64, from: UserId, to: UserId) -> Message {
        Message {
            id,
            from_user_id: from,
            to_user_id: to,
            content: format!("msg {id}"),
            timestamp: Utc::now(),
        }
    }

    fn register(
        registry: &WaitRegistry,
        user_id: UserId,
        counterpart: Option<UserId>,
    ) -> (WaiterHandle, oneshot::Receiver<Vec<Message>>) {
        let (tx, rx) = oneshot::channel();
        let handle = registry.register(user_id, counterpart, tx, CancellationToken::new());
        (handle, rx)
    }

    /// Reference predicate straight from the matching rule.
    fn rule(
        waiting: UserId,
        counterpart: Option<UserId>,
        from: UserId,
        to: UserId,
    ) -> bool {
        (waiting == to && (counterpart == Some(from) || counterpart.is_none()))
            || (waiting == from && counterpart == Some(to))
    }

    #[test]
    fn matching_rule_exhaustive_small_domain() {
        // Every (waiting, counterpart-or-any, from, to) tuple over a small
        // id domain, checked against the reference predicate.
        let ids: [UserId; 4] = [1, 2, 3, 4];
        let counterparts: Vec<Option<UserId>> =
            std::iter::once(None).chain(ids.iter().map(|&c| Some(c))).collect();

        for &waiting in &ids {
            for &counterpart in &counterparts {
                for &from in &ids {
                    for &to in &ids {
                        let registry = WaitRegistry::new();
                        let (_, _rx) = register(&registry, waiting, counterpart);
                        let msg = message(1, from, to);
                        let drained = registry.drain_matching(&msg);
                        assert_eq!(
                            drained.len() == 1,
                            rule(waiting, counterpart, from, to),
                            "waiting={waiting} counterpart={counterpart:?} from={from} to={to}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn drain_leaves_non_matching_waiters_registered() {
        let registry = WaitRegistry::new();
        let (_, _rx1) = register(&registry, 1, Some(2));
        let (_, _rx2) = register(&registry, 3, Some(4));

        let drained = registry.drain_matching(&message(1, 2, 1));
        assert_eq!(drained.len(), 1);
        assert_eq!(registry.len(), 1);

        // The survivor still matches its own conversation.
        let drained = registry.drain_matching(&message(2, 4, 3));
        assert_eq!(drained.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = WaitRegistry::new();
        let (handle, _rx) = register(&registry, 1, Some(2));

        assert!(registry.remove(&handle).is_some());
        assert!(registry.remove(&handle).is_none());
    }

    #[test]
    fn drained_waiter_cannot_be_removed_again() {
        let registry = WaitRegistry::new();
        let (handle, _rx) = register(&registry, 1, None);

        let drained = registry.drain_matching(&message(1, 3, 1));
        assert_eq!(drained.len(), 1);
        assert!(registry.remove(&handle).is_none());
    }

    #[test]
    fn drain_resolves_all_matches_not_just_one() {
        // Two waiters for the same user, one filtered and one unfiltered:
        // both match, both are drained (resolve-all policy).
        let registry = WaitRegistry::new();
        let (_, _rx1) = register(&registry, 1, Some(2));
        let (_, _rx2) = register(&registry, 1, None);

        let drained = registry.drain_matching(&message(1, 2, 1));
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn resolve_delivers_on_the_oneshot() {
        let registry = WaitRegistry::new();
        let (handle, rx) = register(&registry, 1, Some(2));

        let waiter = registry.remove(&handle).unwrap();
        let msg = message(7, 2, 1);
        waiter.resolve(vec![msg.clone()]);

        assert_eq!(rx.await.unwrap(), vec![msg]);
    }

    #[test]
    fn resolve_with_dropped_receiver_does_not_panic() {
        let registry = WaitRegistry::new();
        let (handle, rx) = register(&registry, 1, Some(2));
        drop(rx);

        let waiter = registry.remove(&handle).unwrap();
        waiter.resolve(vec![message(1, 2, 1)]);
    }

    #[test]
    fn resolve_disarms_the_timeout_token() {
        let registry = WaitRegistry::new();
        let (tx, _rx) = oneshot::channel();
        let disarm = CancellationToken::new();
        let handle = registry.register(1, Some(2), tx, disarm.clone());

        registry.remove(&handle).unwrap().resolve(Vec::new());
        assert!(disarm.is_cancelled());
    }
}
