//! Application state wiring all services together.
//!
//! Services are generic over repository/hasher traits; AppState pins them
//! to the concrete SQLite and Argon2 implementations from parley-infra.

use std::sync::Arc;
use std::time::Duration;

use parley_core::account::AccountService;
use parley_core::chat::ChatService;
use parley_infra::crypto::Argon2PasswordHasher;
use parley_infra::sqlite::{
    DatabasePool, SqliteMessageRepository, SqliteTokenRepository, SqliteUserRepository,
};
use parley_types::config::ServerConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAccountService =
    AccountService<SqliteUserRepository, SqliteTokenRepository, Argon2PasswordHasher>;

pub type ConcreteChatService = ChatService<SqliteMessageRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<ConcreteAccountService>,
    pub chat: Arc<ConcreteChatService>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(config: &ServerConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url).await?;

        let accounts = AccountService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteTokenRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            Duration::from_secs(config.token_ttl_secs),
        );

        let chat = ChatService::new(
            SqliteMessageRepository::new(db_pool.clone()),
            Duration::from_secs(config.long_poll_timeout_secs),
        );

        Ok(Self {
            accounts: Arc::new(accounts),
            chat: Arc::new(chat),
            db_pool,
        })
    }
}
