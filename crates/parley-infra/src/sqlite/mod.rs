//! SQLite persistence layer.
//!
//! One repository per aggregate, all sharing a [`pool::DatabasePool`] with
//! split reader/writer connections. Timestamps are stored as RFC 3339
//! strings, which also compare correctly as text in `WHERE` clauses.

pub mod message;
pub mod pool;
pub mod token;
pub mod user;

pub use message::SqliteMessageRepository;
pub use pool::DatabasePool;
pub use token::SqliteTokenRepository;
pub use user::SqliteUserRepository;
