//! Long-poll notification engine.
//!
//! A client asking for new messages when none exist becomes a [`Waiter`] in
//! the [`WaitRegistry`]. Exactly one of two events later resolves it:
//!
//! - the [`Notifier`] publishes a newly stored message that matches it, or
//! - the [`TimeoutSupervisor`]'s deadline fires and resolves it with an
//!   empty result ("no new messages").
//!
//! The registry is the single shared mutable resource; `register`, `remove`
//! and `drain_matching` serialize on one mutex, which makes the
//! notify-vs-timeout race safe: whichever side removes the waiter first owns
//! its one-shot resolution, the loser sees it as already gone.

pub mod notifier;
pub mod registry;
pub mod supervisor;

pub use notifier::Notifier;
pub use registry::{WaitRegistry, Waiter, WaiterHandle};
pub use supervisor::TimeoutSupervisor;
