//! Storage infrastructure - connection pooling, schema migrations and backend selection

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageFactory};
pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{connect, PostgresConfig};
