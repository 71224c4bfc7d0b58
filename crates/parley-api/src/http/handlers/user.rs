//! User search HTTP handler.
//!
//! Endpoint:
//! - GET /api/users/search?q=<fragment> - Find users by username (auth)

use axum::extract::{Query, State};
use serde::Deserialize;

use parley_types::user::UserSummary;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/users/search - Substring search on usernames, excluding the caller.
pub async fn search_users(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<UserSummary>>, AppError> {
    let users = state.accounts.search(user_id, &query.q).await?;

    Ok(ApiResponse::success("Users retrieved successfully", users))
}
