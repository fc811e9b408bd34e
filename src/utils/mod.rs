//! Configuration utilities.

/// TOML configuration file model, loading and validation.
pub mod toml_config;
