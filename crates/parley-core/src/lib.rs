//! Business logic for the Parley chat backend.
//!
//! Contains the long-poll notification engine (wait registry, notifier,
//! timeout supervisor), the chat and account services, and the repository
//! traits their infrastructure implementations fulfil.
//!
//! This crate never depends on parley-infra; services are generic over the
//! repository traits so infrastructure stays swappable.

pub mod account;
pub mod chat;
pub mod longpoll;
