//! Accounts: registration, login, profiles, and the contracts their
//! infrastructure implementations fulfil.

pub mod password;
pub mod repository;
pub mod service;

pub use password::PasswordHasher;
pub use repository::{TokenRepository, UserRepository};
pub use service::AccountService;
