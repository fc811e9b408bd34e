//! # BGA - Content-review backend
//!
//! HTTP backend for a content-review front end: users log in, upload
//! materials and review them. The business endpoints serve in-memory fixture
//! data; the authentication core is the part with real security content.
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Credential store, token service and request guard
//! - [`db`] - In-memory fixture data for the business endpoints
//! - [`types`] - Response envelope, DTOs and error handling
//! - [`utils`] - TOML configuration
//!
//! ## Library usage
//!
//! ```rust,ignore
//! use bga::{AppState, BgaConfig};
//!
//! let config = BgaConfig::load("bga.toml")?;
//! let state = AppState::from_config(config)?;
//! let app = bga::api::routes::create_router(state);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Bearer-token authentication.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// In-memory business data.
pub mod db;
/// Core types (envelope, DTOs, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

pub use auth::AuthService;
pub use db::MockStore;
pub use types::{AppError, Result};
pub use utils::toml_config::{BgaConfig, ConfigError};

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::credentials::InMemoryCredentialStore;
use crate::auth::jwt::TokenService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<BgaConfig>,
    /// Login and request authentication
    pub auth: Arc<AuthService>,
    /// Business fixture data
    pub store: Arc<MockStore>,
}

impl AppState {
    pub fn new(config: BgaConfig, auth: AuthService, store: MockStore) -> Self {
        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            store: Arc::new(store),
        }
    }

    /// Builds the full state from configuration using wall-clock time.
    ///
    /// Fails when the signing secret is not set or a user seed is invalid.
    pub fn from_config(config: BgaConfig) -> std::result::Result<Self, ConfigError> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(
        config: BgaConfig,
        clock: Arc<dyn Clock>,
    ) -> std::result::Result<Self, ConfigError> {
        let secret = config.jwt_secret()?;
        let tokens = TokenService::with_clock(secret.as_bytes(), config.token_ttl()?, clock)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let records = config.user_records()?;
        let store = InMemoryCredentialStore::from_records(records)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        tracing::info!(users = store.len(), "credential store loaded");

        let auth = AuthService::new(Arc::new(store), Arc::new(tokens));
        Ok(Self::new(config, auth, MockStore::seeded()))
    }
}
