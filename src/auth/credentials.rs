//! Credential store: username → (password hash, role, active flag).
//!
//! Lookups are exact, case-sensitive matches. Password checks run one
//! Argon2id verification whether or not the username exists, so a wrong
//! password and an unknown user are indistinguishable to the caller.

use crate::types::{AppError, Result, Role};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// A stored account.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    /// Argon2 PHC string; never logged or returned.
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user(&self, username: &str) -> Option<UserRecord>;

    /// `true` only for an existing, active user whose hash matches.
    /// Never errors; unknown users simply yield `false`.
    async fn verify_password(&self, username: &str, plaintext: &str) -> bool;
}

/// Hashes a password using Argon2id, returning a PHC-formatted string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a PHC string. An unparseable hash never matches.
pub fn verify_hash(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Process-local credential store seeded at startup.
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
    // Verified against for unknown usernames to keep both failure paths alike
    dummy_hash: String,
}

impl InMemoryCredentialStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            users: RwLock::new(HashMap::new()),
            dummy_hash: hash_password(&uuid::Uuid::new_v4().to_string())?,
        })
    }

    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Result<Self> {
        let store = Self::new()?;
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Adds a record. Usernames are unique.
    pub fn insert(&self, record: UserRecord) -> Result<()> {
        let mut users = self.users.write();
        if users.contains_key(&record.username) {
            return Err(AppError::InvalidInput(format!(
                "User '{}' already exists",
                record.username
            )));
        }
        users.insert(record.username.clone(), record);
        Ok(())
    }

    /// Flips the active flag. Returns `false` when the user does not exist.
    pub fn set_active(&self, username: &str, active: bool) -> bool {
        match self.users.write().get_mut(username) {
            Some(record) => {
                record.active = active;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, username: &str) -> Option<UserRecord> {
        self.users.write().remove(username)
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user(&self, username: &str) -> Option<UserRecord> {
        self.users.read().get(username).cloned()
    }

    async fn verify_password(&self, username: &str, plaintext: &str) -> bool {
        // Clone out so the lock is not held across the hash computation
        let record = self.users.read().get(username).cloned();
        let dummy_hash = self.dummy_hash.clone();
        let plaintext = plaintext.to_string();

        // Argon2 is CPU-bound; keep it off the async workers
        let verified = tokio::task::spawn_blocking(move || match record {
            Some(record) => verify_hash(&plaintext, &record.password_hash) && record.active,
            None => {
                let _ = verify_hash(&plaintext, &dummy_hash);
                false
            }
        })
        .await;

        verified.unwrap_or_else(|e| {
            tracing::error!(error = %e, "password verification task failed");
            false
        })
    }
}
