//! Client repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Agent, Appointment, Client, NewAppointment, Property, PropertyStatus, Transaction,
};

/// Filter criteria for browsing property listings.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    /// Only listings by this agent.
    pub agent_id: Option<i64>,
    /// Only listings with this status.
    pub status: Option<PropertyStatus>,
    /// Only listings in this city, exact match.
    pub city: Option<String>,
}

/// Client-facing data access.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// A client by id.
    async fn get_client(&self, client_id: i64) -> DomainResult<Client>;

    /// A single listing by id.
    async fn get_property(&self, property_id: i64) -> DomainResult<Property>;

    /// Browse listings with optional filters.
    async fn list_properties(&self, filter: PropertyFilter) -> DomainResult<Vec<Property>>;

    /// Agents the client has a relationship with.
    async fn get_agents_for_client(&self, client_id: i64) -> DomainResult<Vec<Agent>>;

    /// Every appointment the client has booked, oldest first.
    async fn get_appointments_for_client(&self, client_id: i64) -> DomainResult<Vec<Appointment>>;

    /// Book an appointment and link the client to the agent.
    async fn add_appointment(&self, appointment: NewAppointment) -> DomainResult<Appointment>;

    /// Every transaction the client is party to, oldest first.
    async fn get_transactions_for_client(&self, client_id: i64) -> DomainResult<Vec<Transaction>>;

    /// Mark a transaction as paid now.
    async fn pay_transaction(&self, transaction_id: i64) -> DomainResult<Transaction>;
}
