//! Bearer token authentication extractor.
//!
//! Extracts and verifies tokens from:
//! - `Authorization: Bearer <token>` header
//! - `X-API-Key: <token>` header
//!
//! Resolution goes through `AccountService::authenticate`, which only sees
//! the token's hash at rest.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parley_types::user::UserId;

use crate::http::error::AppError;
use crate::state::AppState;

/// Verified identity of the requesting user. Extracting this validates the
/// bearer token; handlers receive the opaque integer identity and nothing
/// about the token itself.
pub struct CurrentUser(pub UserId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let user_id = state
            .accounts
            .authenticate(&token)
            .await
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(CurrentUser(user_id))
    }
}

/// Extract the bearer token from request headers.
fn extract_token(parts: &Parts) -> Result<String, AppError> {
    // Try Authorization: Bearer <token>
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    // Try X-API-Key header
    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid X-API-Key header encoding".to_string()))?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing token. Provide via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header."
            .to_string(),
    ))
}
