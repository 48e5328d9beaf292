//! Human and JSON views of domain records shared by the agent and client commands.

use serde::Serialize;

use crate::cli::output::{list_table, render_list, truncate, CommandOutput};
use crate::domain::models::{Agent, Appointment, Client, Office, Property, Transaction};

/// One agent, rendered as a key/value table.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AgentView(pub Agent);

impl CommandOutput for AgentView {
    fn to_human(&self) -> String {
        let agent = &self.0;
        let mut lines = vec![
            format!("Agent: {}", agent.full_name()),
            format!("ID: {}", agent.id),
            format!("Email: {}", agent.email),
            format!("Phone: {}", agent.phone),
        ];
        if let Some(license) = &agent.license_number {
            lines.push(format!("License: {license}"));
        }
        if let Some(hired) = agent.date_hired {
            lines.push(format!("Hired: {hired}"));
        }
        match agent.office_id {
            Some(office_id) => lines.push(format!("Office: {office_id}")),
            None => lines.push("Office: unassigned".to_string()),
        }
        lines.join("\n")
    }
}

/// The office an agent works out of, if any.
#[derive(Debug, Serialize)]
pub struct OfficeView {
    /// Agent that was looked up.
    pub agent_id: i64,
    /// None when the agent has no office.
    pub office: Option<Office>,
}

impl CommandOutput for OfficeView {
    fn to_human(&self) -> String {
        match &self.office {
            None => format!("Agent {} has no office assigned.", self.agent_id),
            Some(office) => format!(
                "Office: {}\n{}\n{}, {} {}\nPhone: {}",
                office.name, office.street, office.city, office.state, office.zipcode, office.phone
            ),
        }
    }
}

/// One client, rendered as a key/value table.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ClientView(pub Client);

impl CommandOutput for ClientView {
    fn to_human(&self) -> String {
        let client = &self.0;
        let mut lines = vec![
            format!("Client: {}", client.full_name()),
            format!("ID: {}", client.id),
            format!("Email: {}", client.email),
            format!("Phone: {}", client.phone),
        ];
        if !client.street.is_empty() {
            lines.push(format!(
                "Address: {}, {}, {} {}",
                client.street, client.city, client.state, client.zipcode
            ));
        }
        lines.join("\n")
    }
}

/// A list of agents.
#[derive(Debug, Serialize)]
pub struct AgentListView {
    /// Agents in id order.
    pub agents: Vec<Agent>,
    /// Number of agents.
    pub total: usize,
}

impl From<Vec<Agent>> for AgentListView {
    fn from(agents: Vec<Agent>) -> Self {
        Self { total: agents.len(), agents }
    }
}

impl CommandOutput for AgentListView {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "email", "phone"]);
        for agent in &self.agents {
            table.add_row(vec![
                agent.id.to_string(),
                agent.full_name(),
                agent.email.clone(),
                agent.phone.clone(),
            ]);
        }
        render_list("agent", &table, self.total)
    }
}

/// A list of clients.
#[derive(Debug, Serialize)]
pub struct ClientListView {
    /// Clients in id order.
    pub clients: Vec<Client>,
    /// Number of clients.
    pub total: usize,
}

impl From<Vec<Client>> for ClientListView {
    fn from(clients: Vec<Client>) -> Self {
        Self { total: clients.len(), clients }
    }
}

impl CommandOutput for ClientListView {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "email", "phone"]);
        for client in &self.clients {
            table.add_row(vec![
                client.id.to_string(),
                client.full_name(),
                client.email.clone(),
                client.phone.clone(),
            ]);
        }
        render_list("client", &table, self.total)
    }
}

/// A list of property listings.
#[derive(Debug, Serialize)]
pub struct PropertyListView {
    /// Listings in id order.
    pub properties: Vec<Property>,
    /// Number of listings.
    pub total: usize,
}

impl From<Vec<Property>> for PropertyListView {
    fn from(properties: Vec<Property>) -> Self {
        Self { total: properties.len(), properties }
    }
}

impl CommandOutput for PropertyListView {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "type", "address", "price", "bd/ba", "sqft", "status", "listed"]);
        for p in &self.properties {
            table.add_row(vec![
                p.id.to_string(),
                p.property_type.as_str().to_string(),
                truncate(&format!("{}, {}, {} {}", p.street, p.city, p.state, p.zipcode), 40),
                p.list_price.to_string(),
                format!("{}/{}", p.num_bedrooms, p.num_bathrooms),
                p.square_footage.to_string(),
                p.status.as_str().to_string(),
                p.listing_date.to_string(),
            ]);
        }
        render_list("property", &table, self.total)
    }
}

/// A list of appointments.
#[derive(Debug, Serialize)]
pub struct AppointmentListView {
    /// Appointments in id order.
    pub appointments: Vec<Appointment>,
    /// Number of appointments.
    pub total: usize,
}

impl From<Vec<Appointment>> for AppointmentListView {
    fn from(appointments: Vec<Appointment>) -> Self {
        Self { total: appointments.len(), appointments }
    }
}

impl CommandOutput for AppointmentListView {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "date", "time", "agent", "client", "property", "purpose"]);
        for a in &self.appointments {
            table.add_row(vec![
                a.id.to_string(),
                a.appointment_date.to_string(),
                a.appointment_time.format("%H:%M").to_string(),
                a.agent_id.to_string(),
                a.client_id.to_string(),
                a.property_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                truncate(&a.purpose, 30),
            ]);
        }
        render_list("appointment", &table, self.total)
    }
}

/// A list of transactions.
#[derive(Debug, Serialize)]
pub struct TransactionListView {
    /// Transactions in id order.
    pub transactions: Vec<Transaction>,
    /// Number of transactions.
    pub total: usize,
}

impl From<Vec<Transaction>> for TransactionListView {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self { total: transactions.len(), transactions }
    }
}

impl CommandOutput for TransactionListView {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "type", "amount", "agent", "client", "created", "paid"]);
        for t in &self.transactions {
            table.add_row(vec![
                t.id.to_string(),
                t.transaction_type.as_str().to_string(),
                t.amount.to_string(),
                t.agent_id.to_string(),
                t.client_id.to_string(),
                t.created_at.format("%Y-%m-%d %H:%M").to_string(),
                t.paid_at
                    .map_or_else(|| "unpaid".to_string(), |ts| ts.format("%Y-%m-%d").to_string()),
            ]);
        }
        render_list("transaction", &table, self.total)
    }
}
