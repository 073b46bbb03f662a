use serde::Deserialize;

use crate::infrastructure::user::HashCost;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub hashing: HashingConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HashingConfig {
    pub cost: HashCost,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub transport: MailTransport,
    pub from_address: String,
    /// Root of the links embedded in activation and reset emails
    pub base_url: String,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    #[default]
    Memory,
    Smtp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 5,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::default(),
            from_address: "noreply@example.com".to_string(),
            base_url: "http://localhost:3000".to_string(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: None,
            password: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.storage.database_url.is_none());
        assert_eq!(config.hashing.cost, HashCost::Default);
        assert_eq!(config.mail.transport, MailTransport::Memory);
        assert_eq!(config.mail.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_partial_sources_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "storage": { "backend": "postgres", "database_url": "postgres://localhost/app" },
            "hashing": { "cost": "minimum" },
            "mail": { "transport": "smtp", "smtp": { "host": "smtp.example.com" } }
        }))
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.hashing.cost, HashCost::Minimum);
        assert_eq!(config.mail.transport, MailTransport::Smtp);
        assert_eq!(config.mail.smtp.host, "smtp.example.com");
        assert_eq!(config.mail.smtp.port, 587);
        assert_eq!(config.logging.level, "info");
    }
}
