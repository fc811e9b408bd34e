//! Bearer-token authentication
//!
//! This module is the only part of the server with real security content.
//! Business handlers consume it through the [`AuthUser`](middleware::AuthUser)
//! extractor and never see credentials or tokens themselves.
//!
//! # Module Structure
//!
//! - [`auth::credentials`](crate::auth::credentials) - Credential store and Argon2id hashing
//! - [`auth::jwt`](crate::auth::jwt) - HS256 token issuance and verification
//! - [`auth::clock`](crate::auth::clock) - Injectable time source
//! - [`auth::middleware`](crate::auth::middleware) - Request guard, axum layer and extractor
//!
//! # Flow
//!
//! ```text
//! login ──► CredentialStore::verify_password ──► TokenService::issue ──► token
//! request ──► bearer_token ──► TokenService::verify ──► CredentialStore::find_user ──► AuthenticatedUser
//! ```
//!
//! A token is valid from issuance until `exp`; there is no revocation.
//! Logging out is a client-side discard.
//!
//! # Configuration
//!
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"   # Required at startup, never stored in the file
//! token_ttl_minutes = 30
//! ```

/// Injectable time source.
pub mod clock;
/// Credential store and password hashing.
pub mod credentials;
/// Token issuance and verification.
pub mod jwt;
/// Authentication guard, middleware and extractors.
pub mod middleware;

use crate::types::{AppError, AuthError, LoginResponse, Result};
use credentials::CredentialStore;
use jwt::TokenService;
use middleware::AuthGuard;
use std::sync::Arc;

/// Login orchestration over the credential store and token service.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
    guard: AuthGuard,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>) -> Self {
        let guard = AuthGuard::new(tokens.clone(), store.clone());
        Self {
            store,
            tokens,
            guard,
        }
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    /// Checks the password and issues a token carrying the stored role.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        if username.is_empty() {
            return Err(AppError::InvalidInput("Username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::InvalidInput("Password must not be empty".to_string()));
        }

        if !self.store.verify_password(username, password).await {
            tracing::info!(username, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        // Removed between the two reads
        let user = self
            .store
            .find_user(username)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        let issued = self.tokens.issue_default(&user.username, &user.role)?;

        tracing::info!(username, role = %user.role, "login succeeded");

        Ok(LoginResponse {
            token: issued.token,
            role: user.role,
            username: user.username,
            expires_at: issued.expires_at,
        })
    }
}
