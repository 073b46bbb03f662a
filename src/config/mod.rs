//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, HashingConfig, LogFormat, LoggingConfig, MailConfig, MailTransport, SmtpConfig,
    StorageBackend, StorageConfig,
};
