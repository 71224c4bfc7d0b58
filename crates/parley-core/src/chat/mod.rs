//! Chat: message persistence contracts and the conversation service.

pub mod repository;
pub mod service;

pub use repository::MessageRepository;
pub use service::ChatService;
