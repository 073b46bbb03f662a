//! Runtime selection of the repository backend

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::domain::{DomainError, MicropostRepository, UserRepository};
use crate::infrastructure::micropost::{InMemoryMicropostRepository, PostgresMicropostRepository};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::migrations::run_storage_migrations;
use super::postgres::{connect, PostgresConfig};

/// The repositories a backend provides
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub microposts: Arc<dyn MicropostRepository>,
}

impl Repositories {
    /// Fresh, empty in-memory repositories
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            microposts: Arc::new(InMemoryMicropostRepository::new()),
        }
    }

    /// Repositories sharing one PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            microposts: Arc::new(PostgresMicropostRepository::new(pool)),
        }
    }
}

/// Factory for creating repositories from configuration
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the configured backend, bringing the PostgreSQL schema up to date first
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageBackend::Postgres => {
                let pool = Self::connect(config).await?;
                run_storage_migrations(&pool).await?;
                Ok(Repositories::postgres(pool))
            }
        }
    }

    /// Opens a pool for the configured database URL
    pub async fn connect(config: &StorageConfig) -> Result<PgPool, DomainError> {
        connect(&Self::postgres_config(config)?).await
    }

    fn postgres_config(config: &StorageConfig) -> Result<PostgresConfig, DomainError> {
        let url = config.database_url.as_deref().ok_or_else(|| {
            DomainError::configuration("storage.database_url is required for the postgres backend")
        })?;

        Ok(PostgresConfig::new(url).with_max_connections(config.max_connections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory() {
        let repos = StorageFactory::create(&StorageConfig::default()).await.unwrap();

        assert_eq!(repos.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_postgres_requires_url() {
        let config = StorageConfig {
            backend: StorageBackend::Postgres,
            database_url: None,
            max_connections: 5,
        };

        let result = StorageFactory::create(&config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_postgres_config_from_storage_config() {
        let config = StorageConfig {
            backend: StorageBackend::Postgres,
            database_url: Some("postgres://localhost/test".to_string()),
            max_connections: 12,
        };

        let pg = StorageFactory::postgres_config(&config).unwrap();
        assert_eq!(pg.url, "postgres://localhost/test");
        assert_eq!(pg.max_connections, 12);
    }
}
