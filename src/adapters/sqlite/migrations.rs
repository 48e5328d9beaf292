//! Embedded, versioned schema migrations.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

/// Failures while bringing the schema up to date.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A migration's SQL failed; nothing from it was kept.
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        /// Version of the failed migration.
        version: i64,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },
    /// The recorded schema version could not be read.
    #[error("Failed to get schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

/// One versioned schema change.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Strictly increasing; recorded once applied.
    pub version: i64,
    /// Human-readable summary stored alongside the version.
    pub description: String,
    /// Statements run inside one transaction.
    pub sql: String,
}

/// Applies embedded migrations to a pool.
pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    /// Migrator over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every migration newer than the recorded version, in order.
    /// Returns how many were applied.
    pub async fn run_embedded_migrations(&self, mut migrations: Vec<Migration>) -> Result<usize, MigrationError> {
        self.ensure_migrations_table().await?;
        let current_version = self.get_current_version().await?;
        migrations.sort_by_key(|m| m.version);
        let pending: Vec<_> = migrations.into_iter().filter(|m| m.version > current_version).collect();

        for migration in &pending {
            self.apply_migration(migration).await?;
            info!(version = migration.version, description = %migration.description, "Applied migration");
        }

        Ok(pending.len())
    }

    async fn ensure_migrations_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MigrationError::ExecutionError { version: 0, source: e })?;
        Ok(())
    }

    /// Highest applied version, or 0 on a fresh database.
    pub async fn get_current_version(&self) -> Result<i64, MigrationError> {
        let (version,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(MigrationError::VersionCheckError)?;
        Ok(version)
    }

    /// Run the migration and record its version in one transaction.
    async fn apply_migration(&self, migration: &Migration) -> Result<(), MigrationError> {
        let failed = |source: sqlx::Error| MigrationError::ExecutionError { version: migration.version, source };

        let mut tx = self.pool.begin().await.map_err(failed)?;
        sqlx::raw_sql(&migration.sql).execute(&mut *tx).await.map_err(failed)?;
        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await.map_err(failed)
    }
}

/// Version 1: the complete brokerage schema.
pub fn initial_schema_migration() -> Migration {
    Migration {
        version: 1,
        description: "Initial brokerage schema".to_string(),
        sql: include_str!("../../../migrations/001_initial_schema.sql").to_string(),
    }
}

/// Every migration shipped with the binary, oldest first.
pub fn all_embedded_migrations() -> Vec<Migration> {
    vec![initial_schema_migration()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_test_pool;

    #[tokio::test]
    async fn test_migrations_apply_once() {
        let pool = create_test_pool().await.unwrap();
        let migrator = Migrator::new(pool.clone());

        assert_eq!(migrator.run_embedded_migrations(all_embedded_migrations()).await.unwrap(), 1);
        assert_eq!(migrator.get_current_version().await.unwrap(), 1);
        assert_eq!(migrator.run_embedded_migrations(all_embedded_migrations()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_migration_is_not_recorded() {
        let pool = create_test_pool().await.unwrap();
        let migrator = Migrator::new(pool.clone());
        migrator.run_embedded_migrations(all_embedded_migrations()).await.unwrap();

        let broken = Migration {
            version: 2,
            description: "broken".to_string(),
            sql: "CREATE TABLE half_done (id INTEGER); THIS IS NOT SQL;".to_string(),
        };
        let result = migrator.run_embedded_migrations(vec![broken]).await;
        assert!(matches!(result, Err(MigrationError::ExecutionError { version: 2, .. })));
        assert_eq!(migrator.get_current_version().await.unwrap(), 1);

        let leftover: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE name = 'half_done'")
                .fetch_optional(&pool)
                .await
                .unwrap();
        assert!(leftover.is_none());
    }
}
