//! Agent-facing service: repository calls under the retry policy.

use std::sync::Arc;

use tracing::info;

use super::retry::RetryPolicy;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Agent, Appointment, Client, NewTransaction, Office, Property, Record, Transaction,
};
use crate::domain::ports::AgentRepository;

/// Agent-side operations with retry on transient storage failures.
pub struct AgentService<R: AgentRepository> {
    repository: Arc<R>,
    retry: RetryPolicy,
}

impl<R: AgentRepository> AgentService<R> {
    /// Service over `repository`, retrying per `retry`.
    pub fn new(repository: Arc<R>, retry: RetryPolicy) -> Self {
        Self { repository, retry }
    }

    /// A agent by id.
    pub async fn get_agent(&self, agent_id: i64) -> DomainResult<Agent> {
        self.retry
            .execute("get_agent", || self.repository.get_agent(agent_id))
            .await
    }

    /// The agent's office, or `None` when unassigned.
    pub async fn get_office(&self, agent_id: i64) -> DomainResult<Option<Office>> {
        self.retry
            .execute("get_office", || self.repository.get_office(agent_id))
            .await
    }

    /// Add a listing from raw column values and return its id.
    pub async fn add_property(&self, fields: Record) -> DomainResult<i64> {
        let id = self
            .retry
            .execute("add_property", || self.repository.add_property(fields.clone()))
            .await?;
        info!(property_id = id, "Property listed");
        Ok(id)
    }

    /// Listings by the agent, oldest first.
    pub async fn get_properties(&self, agent_id: i64) -> DomainResult<Vec<Property>> {
        self.retry
            .execute("get_properties_by_agent", || self.repository.get_properties_by_agent(agent_id))
            .await
    }

    /// The agent's appointments, oldest first.
    pub async fn get_appointments(&self, agent_id: i64) -> DomainResult<Vec<Appointment>> {
        self.retry
            .execute("get_appointments_by_agent", || {
                self.repository.get_appointments_by_agent(agent_id)
            })
            .await
    }

    /// Clients linked to the agent.
    pub async fn get_clients(&self, agent_id: i64) -> DomainResult<Vec<Client>> {
        self.retry
            .execute("get_clients", || self.repository.get_clients(agent_id))
            .await
    }

    /// Transactions the agent is party to, oldest first.
    pub async fn get_transactions(&self, agent_id: i64) -> DomainResult<Vec<Transaction>> {
        self.retry
            .execute("get_transactions_by_agent", || {
                self.repository.get_transactions_by_agent(agent_id)
            })
            .await
    }

    /// Record a transaction and return it as stored.
    pub async fn add_transaction(&self, transaction: NewTransaction) -> DomainResult<Transaction> {
        let created = self
            .retry
            .execute("add_transaction", || self.repository.add_transaction(transaction.clone()))
            .await?;
        info!(
            transaction_id = created.id,
            agent_id = created.agent_id,
            client_id = created.client_id,
            amount = %created.amount,
            "Transaction recorded"
        );
        Ok(created)
    }
}
