//! User accounts and login sessions
//!
//! Account management is plain CRUD kept in memory next to the record
//! store. Passwords are argon2 hashes; session tokens are random 32-byte
//! values handed to the client and stored server-side only as SHA-256
//! hashes.

use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{CreateUser, UpdateUser, UserAccount, UserRole};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Password is required for new accounts")]
    MissingPassword,

    #[error("Authentication error")]
    Hashing,
}

// =============================================================================
// Password Utilities
// =============================================================================

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| UserError::Hashing)
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// =============================================================================
// User Directory
// =============================================================================

pub struct UserDirectory {
    users: RwLock<Vec<UserAccount>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }

    /// Seed the demo accounts the portal ships with.
    pub async fn seed_defaults(&self) -> Result<(), UserError> {
        let defaults = [
            ("Admin Geral", "admin", UserRole::Admin, "admin123"),
            ("João Silva", "fiscal", UserRole::Inspector, "fiscal123"),
            ("Maria Oliveira", "maria.o", UserRole::Inspector, "senha456"),
        ];
        let mut guard = self.users.write().await;
        for (name, username, role, password) in defaults {
            if guard.iter().any(|u| u.username == username) {
                continue;
            }
            guard.push(UserAccount {
                id: Uuid::new_v4(),
                name: name.to_string(),
                username: username.to_string(),
                role,
                password_hash: hash_password(password)?,
            });
        }
        Ok(())
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Option<UserAccount> {
        let guard = self.users.read().await;
        let user = guard.iter().find(|u| u.username == username)?;
        if verify_password(password, &user.password_hash) {
            Some(user.clone())
        } else {
            None
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<UserAccount, UserError> {
        let guard = self.users.read().await;
        guard
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(UserError::NotFound)
    }

    pub async fn list(&self) -> Vec<UserAccount> {
        self.users.read().await.clone()
    }

    pub async fn create(&self, input: CreateUser) -> Result<UserAccount, UserError> {
        if input.password.trim().is_empty() {
            return Err(UserError::MissingPassword);
        }
        let mut guard = self.users.write().await;
        if guard.iter().any(|u| u.username == input.username) {
            return Err(UserError::DuplicateUsername);
        }
        let user = UserAccount {
            id: Uuid::new_v4(),
            name: input.name,
            username: input.username,
            role: input.role,
            password_hash: hash_password(&input.password)?,
        };
        guard.push(user.clone());
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, changes: UpdateUser) -> Result<UserAccount, UserError> {
        let mut guard = self.users.write().await;

        if let Some(ref username) = changes.username {
            if guard.iter().any(|u| u.username == *username && u.id != id) {
                return Err(UserError::DuplicateUsername);
            }
        }

        let user = guard
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UserError::NotFound)?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(password) = changes.password {
            if !password.trim().is_empty() {
                user.password_hash = hash_password(&password)?;
            }
        }

        Ok(user.clone())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        let mut guard = self.users.write().await;
        let before = guard.len();
        guard.retain(|u| u.id != id);
        if guard.len() == before {
            return Err(UserError::NotFound);
        }
        Ok(())
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Sessions
// =============================================================================

#[derive(Debug, Clone)]
struct Session {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    /// Keyed by SHA-256 hash of the token, never the token itself.
    sessions: RwLock<HashMap<String, Session>>,
    expiry: Duration,
}

impl SessionStore {
    pub fn new(expiry_hours: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Create a session and return the raw token for the cookie.
    pub async fn issue(&self, user_id: Uuid) -> String {
        let token = generate_session_token();
        let session = Session {
            user_id,
            expires_at: Utc::now() + self.expiry,
        };
        self.sessions.write().await.insert(hash_token(&token), session);
        token
    }

    pub async fn validate(&self, token: &str) -> Option<Uuid> {
        let key = hash_token(token);
        let guard = self.sessions.read().await;
        let session = guard.get(&key)?;
        if session.expires_at <= Utc::now() {
            return None;
        }
        Some(session.user_id)
    }

    pub async fn revoke(&self, token: &str) {
        self.sessions.write().await.remove(&hash_token(token));
    }
}

fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user_input(username: &str, password: &str) -> CreateUser {
        CreateUser {
            name: "Fiscal Teste".to_string(),
            username: username.to_string(),
            role: UserRole::Inspector,
            password: password.to_string(),
        }
    }

    #[test]
    fn test_hash_token_is_sha256() {
        let hash = hash_token("test-session-token");
        // SHA-256 produces 64-character hex string
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("senha456").unwrap();
        assert!(verify_password("senha456", &hash));
        assert!(!verify_password("senha457", &hash));
    }

    #[tokio::test]
    async fn test_seed_and_authenticate() {
        let directory = UserDirectory::new();
        directory.seed_defaults().await.unwrap();
        let user = directory.authenticate("fiscal", "fiscal123").await.unwrap();
        assert_eq!(user.name, "João Silva");
        assert!(directory.authenticate("fiscal", "wrong").await.is_none());
        assert!(directory.authenticate("ghost", "fiscal123").await.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let directory = UserDirectory::new();
        directory
            .create(create_user_input("fiscal2", "abc123"))
            .await
            .unwrap();
        let err = directory
            .create(create_user_input("fiscal2", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateUsername));
    }

    #[tokio::test]
    async fn test_create_requires_password() {
        let directory = UserDirectory::new();
        let err = directory
            .create(create_user_input("fiscal3", "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::MissingPassword));
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let directory = UserDirectory::new();
        assert!(matches!(
            directory.delete(Uuid::new_v4()).await.unwrap_err(),
            UserError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let directory = UserDirectory::new();
        let user = directory
            .create(create_user_input("fiscal4", "old-pass"))
            .await
            .unwrap();
        directory
            .update(
                user.id,
                UpdateUser {
                    password: Some("new-pass".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(directory.authenticate("fiscal4", "new-pass").await.is_some());
        assert!(directory.authenticate("fiscal4", "old-pass").await.is_none());
    }

    #[tokio::test]
    async fn test_session_issue_validate_revoke() {
        let sessions = SessionStore::new(8);
        let user_id = Uuid::new_v4();
        let token = sessions.issue(user_id).await;
        assert_eq!(sessions.validate(&token).await, Some(user_id));
        sessions.revoke(&token).await;
        assert_eq!(sessions.validate(&token).await, None);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let sessions = SessionStore::new(-1);
        let token = sessions.issue(Uuid::new_v4()).await;
        assert_eq!(sessions.validate(&token).await, None);
    }
}
