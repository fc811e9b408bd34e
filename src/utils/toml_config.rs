//! TOML-based configuration
//!
//! The server reads `bga.toml` once at startup. Secrets are never stored in
//! the file: `[auth].jwt_secret_env` names the environment variable that
//! holds the signing key, and the server refuses to start without it.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [auth]
//! jwt_secret_env = "JWT_SECRET"
//! token_ttl_minutes = 30
//!
//! [[users]]
//! username = "admin"
//! role = "admin"
//! password_hash = "$argon2id$v=19$..."
//! ```

use crate::auth::credentials::{hash_password, UserRecord};
use crate::auth::jwt::DEFAULT_TOKEN_TTL_MINUTES;
use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Root configuration structure loaded from bga.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BgaConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Accounts loaded into the credential store at startup
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            cors_origins: default_cors_origins(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    DEFAULT_TOKEN_TTL_MINUTES
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

// ============= User Seeds =============

#[derive(Clone, Serialize, Deserialize)]
pub struct UserSeed {
    pub username: String,
    pub role: Role,

    #[serde(default = "default_true")]
    pub active: bool,

    /// Argon2 PHC string
    #[serde(default)]
    pub password_hash: Option<String>,

    /// Plaintext password, hashed at startup. Demo setups only.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_true() -> bool {
    true
}

impl std::fmt::Debug for UserSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSeed")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl BgaConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: BgaConfig = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_ttl_minutes must be positive, got {}",
                self.auth.token_ttl_minutes
            )));
        }
        self.token_ttl()?;

        if self.auth.jwt_secret_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret_env must name an environment variable".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                return Err(ConfigError::ValidationError(
                    "users: username must not be empty".to_string(),
                ));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "users: duplicate username '{}'",
                    user.username
                )));
            }
            match (&user.password_hash, &user.password) {
                (Some(_), None) | (None, Some(_)) => {}
                _ => {
                    return Err(ConfigError::ValidationError(format!(
                        "users.{}: set exactly one of password_hash or password",
                        user.username
                    )))
                }
            }
        }

        Ok(())
    }

    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// The signing secret. Absent or empty is a startup failure.
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        let secret = self
            .resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))?;

        if secret.len() < 32 {
            warn!(
                env = %self.auth.jwt_secret_env,
                "JWT secret is shorter than 32 bytes; use a longer random value"
            );
        }

        Ok(secret)
    }

    /// Token lifetime. Values beyond chrono's range are a validation error.
    pub fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_minutes(self.auth.token_ttl_minutes).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "auth.token_ttl_minutes is out of range: {}",
                self.auth.token_ttl_minutes
            ))
        })
    }

    /// Converts the seeds into store records, hashing plaintext passwords.
    pub fn user_records(&self) -> Result<Vec<UserRecord>, ConfigError> {
        self.users
            .iter()
            .map(|seed| {
                let password_hash = match (&seed.password_hash, &seed.password) {
                    (Some(hash), _) => hash.clone(),
                    (None, Some(plain)) => {
                        warn!(
                            username = %seed.username,
                            "plaintext password in configuration; store a password_hash instead"
                        );
                        hash_password(plain)
                            .map_err(|e| ConfigError::ValidationError(e.to_string()))?
                    }
                    (None, None) => {
                        return Err(ConfigError::ValidationError(format!(
                            "users.{}: no password configured",
                            seed.username
                        )))
                    }
                };

                Ok(UserRecord {
                    username: seed.username.clone(),
                    password_hash,
                    role: seed.role.clone(),
                    active: seed.active,
                })
            })
            .collect()
    }
}
