//! Agent repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Agent, Appointment, Client, NewTransaction, Office, Property, Record, Transaction,
};

/// Agent-facing data access.
///
/// Every method is an independent unit of work; listings come back in
/// primary-key order and are empty rather than an error when nothing matches.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Fetch exactly one agent.
    async fn get_agent(&self, agent_id: i64) -> DomainResult<Agent>;

    /// Office the agent works out of, `None` when unassigned.
    async fn get_office(&self, agent_id: i64) -> DomainResult<Option<Office>>;

    /// Validate and insert a property listing, returning its new id.
    ///
    /// `fields` maps property column names to values; text values are
    /// coerced to the column type. All invalid or missing fields are
    /// reported together.
    async fn add_property(&self, fields: Record) -> DomainResult<i64>;

    /// Properties listed by the agent.
    async fn get_properties_by_agent(&self, agent_id: i64) -> DomainResult<Vec<Property>>;

    /// Appointments on the agent's calendar.
    async fn get_appointments_by_agent(&self, agent_id: i64) -> DomainResult<Vec<Appointment>>;

    /// Clients linked to the agent.
    async fn get_clients(&self, agent_id: i64) -> DomainResult<Vec<Client>>;

    /// Transactions recorded for the agent.
    async fn get_transactions_by_agent(&self, agent_id: i64) -> DomainResult<Vec<Transaction>>;

    /// Validate and insert a timestamped transaction.
    async fn add_transaction(&self, transaction: NewTransaction) -> DomainResult<Transaction>;
}
