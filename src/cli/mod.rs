//! CLI module for BGA
//!
//! Provides command-line interface parsing for the bga-server binary.
//! Uses clap for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BGA - Content-review backend
#[derive(Parser, Debug)]
#[command(
    name = "bga-server",
    version,
    about = "BGA - Content-review backend",
    long_about = "HTTP backend for a content-review front end with bearer-token authentication.\n\n\
                  Run without arguments to start the server. The signing secret is read from the\n\
                  environment variable named by [auth].jwt_secret_env (default JWT_SECRET).",
    after_help = "EXAMPLES:\n    \
                  bga-server                         # Start the server (requires bga.toml)\n    \
                  bga-server --config my.toml        # Use a custom config file\n    \
                  bga-server hash-password s3cret    # Print an Argon2id hash for [[users]]"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "bga.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an Argon2id PHC string for a password
    ///
    /// The output goes into `password_hash` of a `[[users]]` entry.
    HashPassword {
        /// Password to hash
        password: String,
    },

    /// Load and validate the configuration file without starting the server
    CheckConfig,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bga-server"]).expect("should parse");
        assert_eq!(cli.config, PathBuf::from("bga.toml"));
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_hash_password_subcommand() {
        let cli = Cli::try_parse_from(["bga-server", "-c", "other.toml", "hash-password", "pw"])
            .expect("should parse");
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        match cli.command {
            Some(Commands::HashPassword { password }) => assert_eq!(password, "pw"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_hash_password_requires_argument() {
        assert!(Cli::try_parse_from(["bga-server", "hash-password"]).is_err());
    }

    #[test]
    fn test_check_config_with_global_flag() {
        let cli = Cli::try_parse_from(["bga-server", "check-config", "--verbose"])
            .expect("should parse");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
    }
}
