//! Deadline enforcement for long-poll waiters.
//!
//! Every registered waiter gets an armed deadline task. On expiry the task
//! attempts a registry removal: winning the race means the waiter was never
//! matched and is resolved with an empty result; losing means the notifier
//! got there first and the expiry is a silent no-op. The waiter's
//! cancellation token disarms the task early when a match resolves it, so
//! long-running processes do not accumulate orphaned timers.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::registry::{WaitRegistry, WaiterHandle};

/// Bounds how long a waiter may stay registered with no matching message.
#[derive(Clone)]
pub struct TimeoutSupervisor {
    registry: Arc<WaitRegistry>,
    window: Duration,
}

impl TimeoutSupervisor {
    pub fn new(registry: Arc<WaitRegistry>, window: Duration) -> Self {
        Self { registry, window }
    }

    /// The configured long-poll window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule the deadline for a freshly registered waiter.
    ///
    /// `disarm` must be the token stored in the waiter at registration;
    /// resolution via a match cancels it and releases this task without
    /// firing. Expiry after the waiter is already gone (removal is the only
    /// cancellation primitive, and it is idempotent) does nothing.
    pub fn arm(&self, handle: WaiterHandle, disarm: CancellationToken) {
        let registry = Arc::clone(&self.registry);
        let window = self.window;

        tokio::spawn(async move {
            tokio::select! {
                _ = disarm.cancelled() => {}
                _ = tokio::time::sleep(window) => {
                    if let Some(waiter) = registry.remove(&handle) {
                        tracing::debug!(?handle, "long-poll window expired with no new messages");
                        waiter.resolve(Vec::new());
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::longpoll::Notifier;
    use chrono::Utc;
    use parley_types::message::Message;
    use tokio::sync::oneshot;

    const WINDOW: Duration = Duration::from_secs(30);

    fn message(from: i64, to: i64) -> Message {
        Message {
            id: 1,
            from_user_id: from,
            to_user_id: to,
            content: "hi".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn arm_waiter(
        registry: &Arc<WaitRegistry>,
        supervisor: &TimeoutSupervisor,
        user_id: i64,
        counterpart: Option<i64>,
    ) -> oneshot::Receiver<Vec<Message>> {
        let (tx, rx) = oneshot::channel();
        let disarm = CancellationToken::new();
        let handle = registry.register(user_id, counterpart, tx, disarm.clone());
        supervisor.arm(handle, disarm);
        rx
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_resolves_with_empty_result() {
        let registry = Arc::new(WaitRegistry::new());
        let supervisor = TimeoutSupervisor::new(Arc::clone(&registry), WINDOW);

        let rx = arm_waiter(&registry, &supervisor, 1, Some(2));

        tokio::time::advance(WINDOW + Duration::from_millis(1)).await;
        assert_eq!(rx.await.unwrap(), Vec::<Message>::new());
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn match_before_expiry_wins_and_disarms_the_timer() {
        let registry = Arc::new(WaitRegistry::new());
        let supervisor = TimeoutSupervisor::new(Arc::clone(&registry), WINDOW);
        let notifier = Notifier::new(Arc::clone(&registry));

        let rx = arm_waiter(&registry, &supervisor, 1, Some(2));

        tokio::time::advance(Duration::from_secs(5)).await;
        let msg = message(2, 1);
        notifier.publish(&msg);

        assert_eq!(rx.await.unwrap(), vec![msg]);

        // Past the original deadline: the disarmed timer must not fire,
        // and there is nothing left to resolve.
        tokio::time::advance(WINDOW).await;
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_after_match_is_a_no_op() {
        let registry = Arc::new(WaitRegistry::new());
        let supervisor = TimeoutSupervisor::new(Arc::clone(&registry), WINDOW);

        let (tx, rx) = oneshot::channel();
        // Deliberately unlinked token: the timer stays armed even though the
        // waiter is resolved first, modelling the lost race.
        let handle = registry.register(1, Some(2), tx, CancellationToken::new());
        supervisor.arm(handle, CancellationToken::new());

        let msg = message(2, 1);
        registry.remove(&handle).unwrap().resolve(vec![msg.clone()]);

        tokio::time::advance(WINDOW + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        // Exactly one resolution, from the match.
        assert_eq!(rx.await.unwrap(), vec![msg]);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_with_abandoned_client_does_not_panic() {
        let registry = Arc::new(WaitRegistry::new());
        let supervisor = TimeoutSupervisor::new(Arc::clone(&registry), WINDOW);

        let rx = arm_waiter(&registry, &supervisor, 1, Some(2));
        drop(rx); // connection abandoned before resolution

        tokio::time::advance(WINDOW + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert!(registry.is_empty());
    }
}
