//! Sample Accounts
//!
//! User accounts for a small social app:
//! - Sign-up with validated name, email and password
//! - Remember-me, account activation and password reset tokens, stored only as digests
//! - Activation and reset emails over SMTP
//! - Microposts owned by users, removed with their owner

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use config::{MailConfig, MailTransport};
use domain::Mailer;
use infrastructure::{
    mail::{InMemoryMailer, SmtpMailer, UserMailer},
    storage::{Repositories, StorageFactory},
    user::{Argon2Hasher, UserService},
};

/// Build the account service for the configured backends
pub async fn create_user_service(config: &AppConfig) -> anyhow::Result<UserService> {
    let repositories = StorageFactory::create(&config.storage).await?;
    let mailer = create_mailer(&config.mail)?;

    Ok(build_user_service(repositories, mailer, config))
}

/// Assemble the service from already-built parts
pub fn build_user_service(
    repositories: Repositories,
    mailer: UserMailer,
    config: &AppConfig,
) -> UserService {
    info!(cost = ?config.hashing.cost, "Using Argon2 digests");

    UserService::new(
        repositories.users,
        repositories.microposts,
        Arc::new(Argon2Hasher::new(config.hashing.cost)),
        mailer,
    )
}

/// Build the configured mail transport wrapped in the account mailer
pub fn create_mailer(config: &MailConfig) -> anyhow::Result<UserMailer> {
    let transport: Arc<dyn Mailer> = match config.transport {
        MailTransport::Memory => {
            info!("Using in-memory mail transport");
            Arc::new(InMemoryMailer::new())
        }
        MailTransport::Smtp => {
            info!(host = %config.smtp.host, port = config.smtp.port, "Using SMTP mail transport");
            Arc::new(SmtpMailer::new(&config.smtp, &config.from_address)?)
        }
    };

    Ok(UserMailer::new(transport, &config.base_url)?)
}
