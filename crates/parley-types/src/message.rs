//! Chat message and conversation summary types for Parley.
//!
//! Messages are immutable once stored; the long-poll engine treats them as
//! opaque payloads to hand to matched waiters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// A single 1-to-1 chat message, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub content: String,
    /// Server-side storage time; conversation ordering key.
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

/// One entry in a user's conversation list: the counterpart plus the most
/// recent message exchanged with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: UserId,
    pub username: String,
    pub fullname: String,
    pub last_message: String,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_timestamp_as_date() {
        let msg = Message {
            id: 1,
            from_user_id: 2,
            to_user_id: 3,
            content: "hello".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"date\":"));
        assert!(!json.contains("\"timestamp\":"));
    }
}
