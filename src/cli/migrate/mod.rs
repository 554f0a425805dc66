//! Migrate command - applies the PostgreSQL schema

use tracing::info;

use crate::infrastructure::storage::{PostgresConfig, PostgresMigrator, StorageType};

/// Apply pending migrations. Requires the PostgreSQL backend.
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let backend: StorageType = config.storage.backend.parse()?;
    if backend != StorageType::Postgres {
        anyhow::bail!(
            "migrations require storage.backend = \"postgres\", got \"{}\"",
            config.storage.backend
        );
    }

    let pool = PostgresConfig::from_settings(&config.storage)?.connect().await?;
    let migrator = PostgresMigrator::new(pool);

    let applied = migrator.run_all().await?;
    let version = migrator.current_version().await?;

    info!(applied, version = ?version, "Migrations complete");
    println!("Applied {} migrations, schema version {:?}", applied, version);

    Ok(())
}
