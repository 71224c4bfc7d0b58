//! User account types for Parley.
//!
//! `User` is the full database row including the password hash and is never
//! serialized to clients. `UserProfile` and `UserSummary` are the public
//! projections returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque integer identity of a user. Every authenticated request carries one.
pub type UserId = i64;

/// A full user account row.
///
/// Contains the password hash; not serializable by design. Convert to
/// [`UserProfile`] before handing to the API layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public projection of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Public view of a user account (own profile, no credential material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Minimal user projection returned by search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub fullname: String,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub fullname: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}
