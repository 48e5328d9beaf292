//! SQLite implementation of the AgentRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::query_builder::{InsertBuilder, SelectBuilder};
use super::record_mapper::{coerce_record, fetch_records, record_to_row};
use super::schema::Table;
use super::{ensure_exists, execute, fetch_by_id, fetch_where, map_all};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Agent, Appointment, Client, NewProperty, NewTransaction, Office, Property, Record, Transaction,
};
use crate::domain::ports::AgentRepository;

/// Agent-side repository backed by a SQLite pool.
#[derive(Clone)]
pub struct SqliteAgentRepository {
    pool: SqlitePool,
}

impl SqliteAgentRepository {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentRepository for SqliteAgentRepository {
    async fn get_agent(&self, agent_id: i64) -> DomainResult<Agent> {
        fetch_by_id(&self.pool, Table::Agent, agent_id).await?.try_into()
    }

    async fn get_office(&self, agent_id: i64) -> DomainResult<Option<Office>> {
        let agent = self.get_agent(agent_id).await?;
        let Some(office_id) = agent.office_id else {
            return Ok(None);
        };
        let office = fetch_by_id(&self.pool, Table::Office, office_id).await?;
        Office::try_from(office).map(Some)
    }

    async fn add_property(&self, fields: Record) -> DomainResult<i64> {
        let (coerced, reported) = coerce_record(Table::Property, &fields)?;
        let property = NewProperty::from_record(&coerced, reported).map_err(DomainError::ValidationError)?;
        let row = record_to_row(Table::Property, &property.to_record(Utc::now().date_naive()))?;
        let statement = InsertBuilder::new(Table::Property).values(&row).build()?;

        let mut tx = self.pool.begin().await?;
        ensure_exists(&mut *tx, Table::Agent, property.agent_id).await?;
        let result = execute(&mut *tx, &statement).await?;
        tx.commit().await?;

        Ok(result.last_insert_rowid())
    }

    async fn get_properties_by_agent(&self, agent_id: i64) -> DomainResult<Vec<Property>> {
        map_all(fetch_where(&self.pool, Table::Property, "agent_id", agent_id).await?)
    }

    async fn get_appointments_by_agent(&self, agent_id: i64) -> DomainResult<Vec<Appointment>> {
        map_all(fetch_where(&self.pool, Table::Appointment, "agent_id", agent_id).await?)
    }

    async fn get_clients(&self, agent_id: i64) -> DomainResult<Vec<Client>> {
        let linked = SelectBuilder::new(Table::ClientAgent)
            .columns(&["client_id"])
            .filter("agent_id", agent_id)
            .build()?;
        let statement = SelectBuilder::new(Table::Client)
            .filter_in("client_id", linked)
            .build()?;
        map_all(fetch_records(&self.pool, Table::Client, &statement).await?)
    }

    async fn get_transactions_by_agent(&self, agent_id: i64) -> DomainResult<Vec<Transaction>> {
        map_all(fetch_where(&self.pool, Table::Transaction, "agent_id", agent_id).await?)
    }

    async fn add_transaction(&self, transaction: NewTransaction) -> DomainResult<Transaction> {
        let record = transaction
            .to_record(Utc::now())
            .map_err(DomainError::ValidationError)?;
        let row = record_to_row(Table::Transaction, &record)?;
        let statement = InsertBuilder::new(Table::Transaction).values(&row).build()?;

        let mut tx = self.pool.begin().await?;
        ensure_exists(&mut *tx, Table::Agent, transaction.agent_id).await?;
        ensure_exists(&mut *tx, Table::Client, transaction.client_id).await?;
        if let Some(property_id) = transaction.property_id {
            ensure_exists(&mut *tx, Table::Property, property_id).await?;
        }
        let id = execute(&mut *tx, &statement).await?.last_insert_rowid();
        let created = fetch_by_id(&mut *tx, Table::Transaction, id).await?;
        tx.commit().await?;

        created.try_into()
    }
}
