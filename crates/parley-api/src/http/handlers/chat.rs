//! Chat HTTP handlers, including the long-poll endpoint.
//!
//! Endpoints:
//! - GET  /api/chat/list                     - Conversation summaries (auth)
//! - GET  /api/chat/{user_id}/messages       - Conversation with one user (auth)
//! - POST /api/chat/{user_id}/messages       - Send a message (auth)
//!
//! `GET .../messages?since=<RFC3339>` is the long-poll entry point: when the
//! store has nothing newer than `since`, the request suspends inside
//! `ChatService::fetch_conversation` until a matching message is published
//! or the poll window expires with an empty result.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use parley_types::message::{ChatSummary, Message};
use parley_types::user::UserId;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    /// RFC3339 cursor; only messages strictly newer than this are returned.
    pub since: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// GET /api/chat/list - Latest message per counterpart, newest first.
pub async fn list_chats(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<ApiResponse<Vec<ChatSummary>>, AppError> {
    let chats = state.chat.list_chats(user_id).await?;

    Ok(ApiResponse::success("Chats retrieved successfully", chats))
}

/// GET /api/chat/{user_id}/messages - Fetch (or long-poll) a conversation.
pub async fn get_messages(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(other_id): Path<UserId>,
    Query(query): Query<MessagesQuery>,
) -> Result<ApiResponse<Vec<Message>>, AppError> {
    let since = query.since.as_deref().map(parse_since).transpose()?;
    let polled = since.is_some();

    let messages = state
        .chat
        .fetch_conversation(user_id, other_id, since)
        .await?;

    let message = if polled && messages.is_empty() {
        "No new messages"
    } else if polled {
        "New message received"
    } else {
        "Messages retrieved successfully"
    };

    Ok(ApiResponse::success(message, messages))
}

/// POST /api/chat/{user_id}/messages - Store a message and wake matching waiters.
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(to_user_id): Path<UserId>,
    Json(req): Json<SendMessageRequest>,
) -> Result<ApiResponse<Message>, AppError> {
    let message = state
        .chat
        .send_message(user_id, to_user_id, &req.content)
        .await?;

    Ok(ApiResponse::created("Message sent successfully", message))
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("Invalid 'since' timestamp: {raw}")))
}
