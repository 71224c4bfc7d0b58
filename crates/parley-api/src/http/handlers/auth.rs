//! Authentication and profile HTTP handlers.
//!
//! Endpoints:
//! - POST /api/auth/register                - Create an account, returns a token
//! - POST /api/auth/login                   - Log in, returns a token
//! - GET  /api/auth/profile                 - Own profile (auth)
//! - POST /api/auth/profile/update          - Update profile fields (auth)
//! - POST /api/auth/profile/change-password - Change password (auth)

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use parley_types::user::{ProfileUpdate, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenData {
    pub token: String,
}

/// POST /api/auth/register - Create an account and issue a token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<ApiResponse<TokenData>, AppError> {
    let token = state
        .accounts
        .register(&req.username, &req.fullname, &req.email, &req.password)
        .await?;

    Ok(ApiResponse::created(
        "User registered successfully",
        TokenData { token },
    ))
}

/// POST /api/auth/login - Verify credentials and issue a token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<ApiResponse<TokenData>, AppError> {
    let token = state.accounts.login(&req.username, &req.password).await?;

    Ok(ApiResponse::success("Login successful", TokenData { token }))
}

/// GET /api/auth/profile - Return the authenticated user's profile.
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<ApiResponse<UserProfile>, AppError> {
    let profile = state.accounts.profile(user_id).await?;

    Ok(ApiResponse::success(
        "Profile retrieved successfully",
        profile,
    ))
}

/// POST /api/auth/profile/update - Update username, fullname, email, avatar.
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<ApiResponse<UserProfile>, AppError> {
    let profile = state.accounts.update_profile(user_id, &update).await?;

    Ok(ApiResponse::success(
        "Profile updated successfully",
        profile,
    ))
}

/// POST /api/auth/profile/change-password - Change the account password.
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, AppError> {
    state
        .accounts
        .change_password(
            user_id,
            &req.old_password,
            &req.new_password,
            &req.confirm_password,
        )
        .await?;

    Ok(ApiResponse::message_only("Password updated successfully"))
}
