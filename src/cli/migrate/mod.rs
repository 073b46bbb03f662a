//! Migrate command - applies or reverts schema migrations

use clap::Args;
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::infrastructure::storage::{Migrator, PostgresMigrator, StorageFactory};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

/// Run the migrate command
pub async fn run(args: MigrateArgs, config: &AppConfig) -> anyhow::Result<()> {
    if config.storage.backend != StorageBackend::Postgres {
        info!("In-memory storage has no schema to migrate");
        return Ok(());
    }

    let pool = StorageFactory::connect(&config.storage).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
    }

    let applied = migrator.applied_versions().await?;
    println!("Applied migrations: {:?}", applied);

    Ok(())
}
