//! Authentication guard and the axum plumbing around it.
//!
//! [`AuthGuard::authenticate`] turns request headers into an
//! [`AuthenticatedUser`] or an [`AuthError`]. [`require_auth`] runs it before
//! any protected handler and stores the result in request extensions, where
//! the [`AuthUser`] extractor picks it up.

use crate::auth::credentials::CredentialStore;
use crate::auth::jwt::TokenService;
use crate::types::{AppError, AuthError, AuthenticatedUser, Role};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Resolves bearer tokens to live accounts.
#[derive(Clone)]
pub struct AuthGuard {
    tokens: Arc<TokenService>,
    store: Arc<dyn CredentialStore>,
}

impl AuthGuard {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn CredentialStore>) -> Self {
        Self { tokens, store }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::Missing)?;
        self.authenticate_token(token).await
    }

    /// Verifies `token` and re-reads the subject from the credential store.
    /// The role comes from the token, not the store.
    pub async fn authenticate_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let verified = self.tokens.verify(token)?;

        match self.store.find_user(&verified.username).await {
            Some(record) if record.active => Ok(AuthenticatedUser {
                username: verified.username,
                role: verified.role,
                active: true,
            }),
            _ => Err(AuthError::InactiveOrUnknown),
        }
    }
}

/// Extracts the credential from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. An empty credential counts as
/// absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = state
        .auth
        .guard()
        .authenticate(req.headers())
        .await
        .inspect_err(|kind| {
            tracing::warn!(
                path = %req.uri().path(),
                reason = ?kind,
                "rejected unauthenticated request"
            );
        })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Handler argument carrying the caller resolved by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    /// Fails with `Forbidden` unless the caller holds one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role '{}' may not perform this action",
                self.0.role
            )))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Auth(AuthError::Missing))
    }
}
