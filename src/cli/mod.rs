//! CLI module for Sample Accounts
//!
//! Operator subcommands:
//! - `migrate`: bring the PostgreSQL schema up to date (or revert one step)
//! - `sign-up`, `activate`, `request-reset`, `reset-password`: account flows

pub mod account;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Sample Accounts - user sign-up, activation and password reset
#[derive(Parser)]
#[command(name = "sample-accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),

    /// Create an account and send its activation email
    SignUp(account::SignUpArgs),

    /// Activate an account with the token from its activation email
    Activate(account::ActivateArgs),

    /// Email a password reset link
    RequestReset(account::RequestResetArgs),

    /// Set a new password with the token from a reset email
    ResetPassword(account::ResetPasswordArgs),
}

/// Load `.env` and configuration, then install logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// Dispatch a parsed command
pub async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Migrate(args) => migrate::run(args, config).await,
        Command::SignUp(args) => account::sign_up(args, config).await,
        Command::Activate(args) => account::activate(args, config).await,
        Command::RequestReset(args) => account::request_reset(args, config).await,
        Command::ResetPassword(args) => account::reset_password(args, config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sign_up() {
        let cli = Cli::try_parse_from([
            "sample-accounts",
            "sign-up",
            "--name",
            "Ann",
            "--email",
            "ann@example.com",
            "--password",
            "secret1",
        ])
        .unwrap();

        match cli.command {
            Command::SignUp(args) => {
                assert_eq!(args.name, "Ann");
                assert_eq!(args.email, "ann@example.com");
                assert!(args.password_confirmation.is_none());
            }
            _ => panic!("Expected sign-up"),
        }
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["sample-accounts", "migrate", "--revert"]).unwrap();

        match cli.command {
            Command::Migrate(args) => assert!(args.revert),
            _ => panic!("Expected migrate"),
        }
    }

    #[test]
    fn test_activate_requires_token() {
        let result = Cli::try_parse_from(["sample-accounts", "activate", "--email", "a@b.co"]);
        assert!(result.is_err());
    }
}
