use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to account operations (registration, login, profile).
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("user already exists")]
    UserExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("incorrect old password")]
    IncorrectPassword,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("password hashing error: {0}")]
    Hash(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Errors related to chat operations (send, fetch, conversation list).
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message content must not be empty")]
    EmptyContent,

    #[error("cannot send a message to yourself")]
    SelfAddressed,

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_account_error_display() {
        assert_eq!(
            AccountError::PasswordTooShort(6).to_string(),
            "password must be at least 6 characters"
        );
        assert_eq!(
            AccountError::InvalidCredentials.to_string(),
            "invalid credentials"
        );
    }

    #[test]
    fn test_chat_error_from_repository() {
        let err: ChatError = RepositoryError::NotFound.into();
        assert!(matches!(err, ChatError::Storage(RepositoryError::NotFound)));
    }
}
