//! Account service: registration, login, profile management, user search.
//!
//! Generic over `UserRepository`, `TokenRepository`, and `PasswordHasher` so
//! the crate stays free of infrastructure dependencies. Login failures are
//! deliberately indistinguishable (unknown user vs. wrong password).

use std::time::Duration;

use parley_types::error::AccountError;
use parley_types::user::{ProfileUpdate, UserId, UserProfile, UserSummary};
use tracing::info;

use crate::account::password::PasswordHasher;
use crate::account::repository::{TokenRepository, UserRepository};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum results returned by a user search.
const SEARCH_LIMIT: i64 = 20;

/// Orchestrates account lifecycle and token issuance.
pub struct AccountService<U: UserRepository, T: TokenRepository, H: PasswordHasher> {
    users: U,
    tokens: T,
    hasher: H,
    token_ttl: Duration,
}

impl<U: UserRepository, T: TokenRepository, H: PasswordHasher> AccountService<U, T, H> {
    pub fn new(users: U, tokens: T, hasher: H, token_ttl: Duration) -> Self {
        Self {
            users,
            tokens,
            hasher,
            token_ttl,
        }
    }

    /// Register a new account and issue a login token.
    pub async fn register(
        &self,
        username: &str,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AccountError> {
        validate_username(username)?;
        validate_fullname(fullname)?;
        validate_email(email)?;
        validate_password(password)?;

        if self.users.username_or_email_exists(username, email).await? {
            return Err(AccountError::UserExists);
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .create(username, fullname, email, &password_hash)
            .await?;
        info!(user_id = user.id, username, "user registered");

        Ok(self.tokens.issue(user.id, self.token_ttl).await?)
    }

    /// Verify credentials and issue a login token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AccountError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        info!(user_id = user.id, "login successful");
        Ok(self.tokens.issue(user.id, self.token_ttl).await?)
    }

    /// Resolve a bearer token to a verified user identity.
    pub async fn authenticate(&self, token: &str) -> Result<UserId, AccountError> {
        self.tokens
            .resolve(token)
            .await?
            .ok_or(AccountError::InvalidToken)
    }

    /// The user's own profile.
    pub async fn profile(&self, user_id: UserId) -> Result<UserProfile, AccountError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;
        Ok(user.profile())
    }

    /// Apply a profile update and return the new profile.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, AccountError> {
        validate_username(&update.username)?;
        validate_fullname(&update.fullname)?;
        validate_email(&update.email)?;

        let user = self.users.update_profile(user_id, update).await?;
        info!(user_id, "profile updated");
        Ok(user.profile())
    }

    /// Change the password after verifying the old one.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AccountError> {
        if new_password != confirm_password {
            return Err(AccountError::PasswordMismatch);
        }
        validate_password(new_password)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if !self.hasher.verify(old_password, &user.password_hash)? {
            return Err(AccountError::IncorrectPassword);
        }

        let new_hash = self.hasher.hash(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;
        info!(user_id, "password changed");
        Ok(())
    }

    /// Search other users by username or full name.
    pub async fn search(&self, me: UserId, query: &str) -> Result<Vec<UserSummary>, AccountError> {
        Ok(self.users.search(query, me, SEARCH_LIMIT).await?)
    }
}

fn validate_username(username: &str) -> Result<(), AccountError> {
    if username.trim().is_empty() {
        return Err(AccountError::InvalidField {
            field: "username",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_fullname(fullname: &str) -> Result<(), AccountError> {
    if fullname.trim().is_empty() {
        return Err(AccountError::InvalidField {
            field: "fullname",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AccountError> {
    // Deliberately shallow: real validation is delivery, not parsing.
    if !email.contains('@') || email.trim().is_empty() {
        return Err(AccountError::InvalidField {
            field: "email",
            reason: "must be a valid email address".to_string(),
        });
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AccountError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parley_types::error::RepositoryError;
    use parley_types::user::User;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct MemoryUserRepository {
        users: Mutex<Vec<User>>,
        next_id: AtomicI64,
    }

    impl UserRepository for MemoryUserRepository {
        async fn create(
            &self,
            username: &str,
            fullname: &str,
            email: &str,
            password_hash: &str,
        ) -> Result<User, RepositoryError> {
            let user = User {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                username: username.to_string(),
                fullname: fullname.to_string(),
                email: email.to_string(),
                avatar: None,
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            };
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn username_or_email_exists(
            &self,
            username: &str,
            email: &str,
        ) -> Result<bool, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .any(|u| u.username == username || u.email == email))
        }

        async fn update_profile(
            &self,
            id: UserId,
            update: &ProfileUpdate,
        ) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(RepositoryError::NotFound)?;
            user.username = update.username.clone();
            user.fullname = update.fullname.clone();
            user.email = update.email.clone();
            if let Some(avatar) = &update.avatar {
                user.avatar = Some(avatar.clone());
            }
            Ok(user.clone())
        }

        async fn update_password(
            &self,
            id: UserId,
            password_hash: &str,
        ) -> Result<(), RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(RepositoryError::NotFound)?;
            user.password_hash = password_hash.to_string();
            Ok(())
        }

        async fn search(
            &self,
            query: &str,
            exclude: UserId,
            limit: i64,
        ) -> Result<Vec<UserSummary>, RepositoryError> {
            let q = query.to_lowercase();
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.id != exclude)
                .filter(|u| {
                    u.username.to_lowercase().contains(&q)
                        || u.fullname.to_lowercase().contains(&q)
                })
                .take(limit as usize)
                .map(|u| UserSummary {
                    id: u.id,
                    username: u.username.clone(),
                    fullname: u.fullname.clone(),
                })
                .collect())
        }
    }

    /// Tokens are `tok-<n>` mapped back to the issuing user.
    #[derive(Default)]
    struct MemoryTokenRepository {
        issued: Mutex<Vec<(String, UserId)>>,
    }

    impl TokenRepository for MemoryTokenRepository {
        async fn issue(&self, user_id: UserId, _ttl: Duration) -> Result<String, RepositoryError> {
            let mut issued = self.issued.lock().unwrap();
            let token = format!("tok-{}", issued.len() + 1);
            issued.push((token.clone(), user_id));
            Ok(token)
        }

        async fn resolve(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
            Ok(self
                .issued
                .lock()
                .unwrap()
                .iter()
                .find(|(t, _)| t == token)
                .map(|(_, id)| *id))
        }
    }

    /// Reversible stand-in hasher; real Argon2 lives in infra.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, AccountError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AccountError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    fn service() -> AccountService<MemoryUserRepository, MemoryTokenRepository, PlainHasher> {
        AccountService::new(
            MemoryUserRepository::default(),
            MemoryTokenRepository::default(),
            PlainHasher,
            Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn register_then_authenticate_roundtrip() {
        let accounts = service();
        let token = accounts
            .register("ada", "Ada Lovelace", "ada@example.com", "secret1")
            .await
            .unwrap();

        let user_id = accounts.authenticate(&token).await.unwrap();
        let profile = accounts.profile(user_id).await.unwrap();
        assert_eq!(profile.username, "ada");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username_or_email() {
        let accounts = service();
        accounts
            .register("ada", "Ada Lovelace", "ada@example.com", "secret1")
            .await
            .unwrap();

        let err = accounts
            .register("ada", "Other Ada", "other@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::UserExists));

        let err = accounts
            .register("ada2", "Other Ada", "ada@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::UserExists));
    }

    #[tokio::test]
    async fn register_rejects_short_password_and_bad_email() {
        let accounts = service();
        let err = accounts
            .register("ada", "Ada", "ada@example.com", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::PasswordTooShort(6)));

        let err = accounts
            .register("ada", "Ada", "not-an-email", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidField { field: "email", .. }));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let accounts = service();
        accounts
            .register("ada", "Ada", "ada@example.com", "secret1")
            .await
            .unwrap();

        let unknown = accounts.login("nobody", "secret1").await.unwrap_err();
        let wrong = accounts.login("ada", "wrong-pass").await.unwrap_err();
        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert!(matches!(wrong, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let accounts = service();
        let err = accounts.authenticate("tok-999").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidToken));
    }

    #[tokio::test]
    async fn change_password_checks_confirmation_and_old_password() {
        let accounts = service();
        let token = accounts
            .register("ada", "Ada", "ada@example.com", "secret1")
            .await
            .unwrap();
        let user_id = accounts.authenticate(&token).await.unwrap();

        let err = accounts
            .change_password(user_id, "secret1", "newpass1", "different")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::PasswordMismatch));

        let err = accounts
            .change_password(user_id, "wrong-old", "newpass1", "newpass1")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::IncorrectPassword));

        accounts
            .change_password(user_id, "secret1", "newpass1", "newpass1")
            .await
            .unwrap();
        accounts.login("ada", "newpass1").await.unwrap();
    }

    #[tokio::test]
    async fn update_profile_returns_new_projection() {
        let accounts = service();
        let token = accounts
            .register("ada", "Ada", "ada@example.com", "secret1")
            .await
            .unwrap();
        let user_id = accounts.authenticate(&token).await.unwrap();

        let update = ProfileUpdate {
            username: "ada_l".to_string(),
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            avatar: Some("/avatars/ada.png".to_string()),
        };
        let profile = accounts.update_profile(user_id, &update).await.unwrap();
        assert_eq!(profile.username, "ada_l");
        assert_eq!(profile.avatar.as_deref(), Some("/avatars/ada.png"));
    }

    #[tokio::test]
    async fn search_excludes_self() {
        let accounts = service();
        accounts
            .register("ada", "Ada Lovelace", "ada@example.com", "secret1")
            .await
            .unwrap();
        let token = accounts
            .register("grace", "Grace Hopper", "grace@example.com", "secret1")
            .await
            .unwrap();
        let me = accounts.authenticate(&token).await.unwrap();

        let hits = accounts.search(me, "a").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "ada");
    }
}
