//! HTTP request handlers, grouped by route prefix.

pub mod auth;
pub mod chat;
pub mod user;
