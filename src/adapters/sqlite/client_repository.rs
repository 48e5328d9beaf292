//! SQLite implementation of the ClientRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::query_builder::{InsertBuilder, SelectBuilder, UpdateBuilder};
use super::record_mapper::{fetch_records, record_to_row};
use super::schema::Table;
use super::{ensure_exists, execute, fetch_by_id, fetch_where, map_all};
use crate::domain::errors::{DomainError, DomainResult, FieldError};
use crate::domain::models::{Agent, Appointment, Client, NewAppointment, Property, Record, Transaction};
use crate::domain::ports::{ClientRepository, PropertyFilter};

/// Status given to a client/agent link created by booking.
const ACTIVE_LINK: &str = "ACTIVE";

/// Client-side repository backed by a SQLite pool.
#[derive(Clone)]
pub struct SqliteClientRepository {
    pool: SqlitePool,
}

impl SqliteClientRepository {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn get_client(&self, client_id: i64) -> DomainResult<Client> {
        fetch_by_id(&self.pool, Table::Client, client_id).await?.try_into()
    }

    async fn get_property(&self, property_id: i64) -> DomainResult<Property> {
        fetch_by_id(&self.pool, Table::Property, property_id).await?.try_into()
    }

    async fn list_properties(&self, filter: PropertyFilter) -> DomainResult<Vec<Property>> {
        let mut builder = SelectBuilder::new(Table::Property);
        if let Some(agent_id) = filter.agent_id {
            builder = builder.filter("agent_id", agent_id);
        }
        if let Some(status) = filter.status {
            builder = builder.filter("status", status.as_str());
        }
        if let Some(city) = filter.city {
            builder = builder.filter("city", city);
        }
        let statement = builder.build()?;
        map_all(fetch_records(&self.pool, Table::Property, &statement).await?)
    }

    async fn get_agents_for_client(&self, client_id: i64) -> DomainResult<Vec<Agent>> {
        let linked = SelectBuilder::new(Table::ClientAgent)
            .columns(&["agent_id"])
            .filter("client_id", client_id)
            .order_by("agent_id")
            .build()?;
        let statement = SelectBuilder::new(Table::Agent)
            .filter_in("agent_id", linked)
            .build()?;
        map_all(fetch_records(&self.pool, Table::Agent, &statement).await?)
    }

    async fn get_appointments_for_client(&self, client_id: i64) -> DomainResult<Vec<Appointment>> {
        map_all(fetch_where(&self.pool, Table::Appointment, "client_id", client_id).await?)
    }

    async fn add_appointment(&self, appointment: NewAppointment) -> DomainResult<Appointment> {
        let record = appointment.to_record().map_err(DomainError::ValidationError)?;
        let row = record_to_row(Table::Appointment, &record)?;
        let insert = InsertBuilder::new(Table::Appointment).values(&row).build()?;
        let link = InsertBuilder::new(Table::ClientAgent)
            .or_ignore()
            .values(
                &Record::new()
                    .with("client_id", appointment.client_id)
                    .with("agent_id", appointment.agent_id)
                    .with("relationship_date", Utc::now())
                    .with("status", ACTIVE_LINK),
            )
            .build()?;

        let mut tx = self.pool.begin().await?;
        ensure_exists(&mut *tx, Table::Agent, appointment.agent_id).await?;
        ensure_exists(&mut *tx, Table::Client, appointment.client_id).await?;
        if let Some(property_id) = appointment.property_id {
            ensure_exists(&mut *tx, Table::Property, property_id).await?;
        }
        let id = execute(&mut *tx, &insert).await?.last_insert_rowid();
        execute(&mut *tx, &link).await?;
        let created = fetch_by_id(&mut *tx, Table::Appointment, id).await?;
        tx.commit().await?;

        created.try_into()
    }

    async fn get_transactions_for_client(&self, client_id: i64) -> DomainResult<Vec<Transaction>> {
        map_all(fetch_where(&self.pool, Table::Transaction, "client_id", client_id).await?)
    }

    async fn pay_transaction(&self, transaction_id: i64) -> DomainResult<Transaction> {
        let mut tx = self.pool.begin().await?;
        let current = Transaction::try_from(fetch_by_id(&mut *tx, Table::Transaction, transaction_id).await?)?;
        if current.is_paid() {
            return Err(DomainError::ValidationError(vec![FieldError::new(
                "transaction_id",
                format!("{transaction_id} is already paid"),
            )]));
        }

        let update = UpdateBuilder::new(Table::Transaction)
            .set("paid_at", Utc::now())
            .filter("transaction_id", transaction_id)
            .build()?;
        execute(&mut *tx, &update).await?;
        let paid = fetch_by_id(&mut *tx, Table::Transaction, transaction_id).await?;
        tx.commit().await?;

        paid.try_into()
    }
}
