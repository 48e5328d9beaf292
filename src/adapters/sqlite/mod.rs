//! SQLite storage adapter for the brokerage data-access layer.

pub mod agent_repository;
pub mod client_repository;
pub mod connection;
pub mod migrations;
pub mod query_builder;
pub mod record_mapper;
pub mod schema;

pub use agent_repository::SqliteAgentRepository;
pub use client_repository::SqliteClientRepository;
pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use query_builder::{build, InsertBuilder, SelectBuilder, Statement, StatementKind, UpdateBuilder};
pub use record_mapper::{coerce_record, record_to_row, row_to_record};
pub use schema::{Column, Table};

use sqlx::sqlite::{Sqlite, SqliteQueryResult};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DatabaseConfig, Record};
use record_mapper::{expect_single, fetch_records};

/// Startup failures: opening the pool or migrating it.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The pool could not be opened.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// The schema could not be migrated.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Open the configured database and bring its schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(&config.url(), Some(PoolConfig::from(config))).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Execute a write statement.
pub(crate) async fn execute<'c, E>(executor: E, statement: &Statement) -> DomainResult<SqliteQueryResult>
where
    E: Executor<'c, Database = Sqlite>,
{
    debug!(sql = %statement.sql, args = statement.args.len(), "execute");
    Ok(statement.query().execute(executor).await?)
}

/// Select rows of `table` with `column = value`, in primary-key order.
pub(crate) async fn fetch_where<'c, E>(executor: E, table: Table, column: &str, value: i64) -> DomainResult<Vec<Record>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let statement = SelectBuilder::new(table).filter(column, value).build()?;
    fetch_records(executor, table, &statement).await
}

/// The single row of `table` whose primary key is `id`.
pub(crate) async fn fetch_by_id<'c, E>(executor: E, table: Table, id: i64) -> DomainResult<Record>
where
    E: Executor<'c, Database = Sqlite>,
{
    let records = fetch_where(executor, table, table.primary_key(), id).await?;
    expect_single(records, table.entity(), id)
}

/// `NotFound` unless a row of `table` has primary key `id`.
pub(crate) async fn ensure_exists<'c, E>(executor: E, table: Table, id: i64) -> DomainResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    let key = table.primary_key();
    let statement = SelectBuilder::new(table).columns(&[key]).filter(key, id).build()?;
    let found = fetch_records(executor, table, &statement).await?;
    if found.is_empty() {
        return Err(DomainError::NotFound { entity: table.entity(), id });
    }
    Ok(())
}

/// Map each record into a domain type.
pub(crate) fn map_all<T>(records: Vec<Record>) -> DomainResult<Vec<T>>
where
    T: TryFrom<Record, Error = DomainError>,
{
    records.into_iter().map(T::try_from).collect()
}
