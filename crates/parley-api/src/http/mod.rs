//! HTTP layer: router, envelope responses, error mapping, auth extraction,
//! and the request handlers.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
