//! Client-facing service.

use std::sync::Arc;

use tracing::info;

use super::retry::RetryPolicy;
use crate::domain::errors::DomainResult;
use crate::domain::models::{Agent, Appointment, Client, NewAppointment, Property, Transaction};
use crate::domain::ports::{ClientRepository, PropertyFilter};

/// Client-side operations with retry on transient storage failures.
pub struct ClientService<R: ClientRepository> {
    repository: Arc<R>,
    retry: RetryPolicy,
}

impl<R: ClientRepository> ClientService<R> {
    /// Service over `repository`, retrying per `retry`.
    pub fn new(repository: Arc<R>, retry: RetryPolicy) -> Self {
        Self { repository, retry }
    }

    /// A client by id.
    pub async fn get_client(&self, client_id: i64) -> DomainResult<Client> {
        self.retry
            .execute("get_client", || self.repository.get_client(client_id))
            .await
    }

    /// A single listing by id.
    pub async fn get_property(&self, property_id: i64) -> DomainResult<Property> {
        self.retry
            .execute("get_property", || self.repository.get_property(property_id))
            .await
    }

    /// Listings matching every filter that is set.
    pub async fn browse_properties(&self, filter: PropertyFilter) -> DomainResult<Vec<Property>> {
        self.retry
            .execute("list_properties", || self.repository.list_properties(filter.clone()))
            .await
    }

    /// Agents the client has booked with.
    pub async fn get_agents(&self, client_id: i64) -> DomainResult<Vec<Agent>> {
        self.retry
            .execute("get_agents_for_client", || self.repository.get_agents_for_client(client_id))
            .await
    }

    /// The client's appointments, oldest first.
    pub async fn get_appointments(&self, client_id: i64) -> DomainResult<Vec<Appointment>> {
        self.retry
            .execute("get_appointments_for_client", || {
                self.repository.get_appointments_for_client(client_id)
            })
            .await
    }

    /// Book an appointment; the client becomes linked to the agent.
    pub async fn book_appointment(&self, appointment: NewAppointment) -> DomainResult<Appointment> {
        let booked = self
            .retry
            .execute("add_appointment", || self.repository.add_appointment(appointment.clone()))
            .await?;
        info!(
            appointment_id = booked.id,
            agent_id = booked.agent_id,
            client_id = booked.client_id,
            "Appointment booked"
        );
        Ok(booked)
    }

    /// Transactions the client is party to, oldest first.
    pub async fn get_transactions(&self, client_id: i64) -> DomainResult<Vec<Transaction>> {
        self.retry
            .execute("get_transactions_for_client", || {
                self.repository.get_transactions_for_client(client_id)
            })
            .await
    }

    /// Mark an outstanding transaction paid.
    pub async fn pay_transaction(&self, transaction_id: i64) -> DomainResult<Transaction> {
        let paid = self
            .retry
            .execute("pay_transaction", || self.repository.pay_transaction(transaction_id))
            .await?;
        info!(transaction_id, "Transaction paid");
        Ok(paid)
    }
}
