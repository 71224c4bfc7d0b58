//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{AccountError, ChatError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Account-related errors.
    Account(AccountError),
    /// Chat-related errors.
    Chat(ChatError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Account(AccountError::UserExists) => {
                (StatusCode::BAD_REQUEST, "User already exists".to_string())
            }
            AppError::Account(AccountError::InvalidCredentials) => {
                (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
            }
            AppError::Account(AccountError::InvalidToken) => {
                (StatusCode::UNAUTHORIZED, "Invalid or expired token".to_string())
            }
            AppError::Account(AccountError::UserNotFound) => {
                (StatusCode::NOT_FOUND, "User not found".to_string())
            }
            AppError::Account(AccountError::PasswordMismatch) => {
                (StatusCode::BAD_REQUEST, "Passwords do not match".to_string())
            }
            AppError::Account(AccountError::IncorrectPassword) => {
                (StatusCode::BAD_REQUEST, "Incorrect old password".to_string())
            }
            AppError::Account(e @ AccountError::PasswordTooShort(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Account(e @ AccountError::InvalidField { .. }) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Account(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error during account operation".to_string(),
            ),
            AppError::Chat(e @ ChatError::EmptyContent) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Chat(e @ ChatError::SelfAddressed) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Chat(ChatError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error during chat operation".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "status": "error",
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
