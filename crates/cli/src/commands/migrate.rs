//! # CLI Migration Command

use error::Result;
use migration::{db::DatabaseConfig, Migrator, MigratorTrait as _};
use tracing::info;

use crate::commands::MigrateArgs;

/// Applies, lists or rolls back migrations.
pub async fn migrate(config: &DatabaseConfig, args: MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        database = %config.redacted_connection_string(),
        "Running database migrations..."
    );

    let db = config.connect().await?;

    if args.dry_run {
        let pending = Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get pending migrations: {}", e))?;

        info!(target: "migrate", pending_count = %pending.len(), "Pending migrations found");
        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }
        return Ok(());
    }

    if args.rollback {
        Migrator::down(&db, Some(1))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to rollback migration: {}", e))?;

        info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!(target: "migrate", "Migrations completed successfully");
    Ok(())
}
