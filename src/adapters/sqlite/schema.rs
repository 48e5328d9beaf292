//! Allow-listed table schemas.
//!
//! Every identifier that ends up in statement text comes from these tables.
//! Caller-supplied column names are only ever used to look a column up here.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ValueKind;
use crate::domain::models::ValueKind::{Date, Decimal, Integer, Text, Time, Timestamp};

/// A permitted column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Identifier as it appears in statement text.
    pub name: &'static str,
    /// Type values are coerced to before binding.
    pub kind: ValueKind,
    /// Assigned by storage; never written by callers.
    pub generated: bool,
}

const fn col(name: &'static str, kind: ValueKind) -> Column {
    Column { name, kind, generated: false }
}

const fn key(name: &'static str) -> Column {
    Column { name, kind: ValueKind::Integer, generated: true }
}

const OFFICE_COLUMNS: &[Column] = &[
    key("office_id"),
    col("office_name", Text),
    col("street", Text),
    col("city", Text),
    col("state", Text),
    col("zipcode", Text),
    col("phone", Text),
];

const AGENT_COLUMNS: &[Column] = &[
    key("agent_id"),
    col("office_id", Integer),
    col("first_name", Text),
    col("last_name", Text),
    col("email", Text),
    col("phone", Text),
    col("license_number", Text),
    col("date_hired", Date),
];

const CLIENT_COLUMNS: &[Column] = &[
    key("client_id"),
    col("first_name", Text),
    col("last_name", Text),
    col("email", Text),
    col("phone", Text),
    col("street", Text),
    col("city", Text),
    col("state", Text),
    col("zipcode", Text),
];

const CLIENT_AGENT_COLUMNS: &[Column] = &[
    col("client_id", Integer),
    col("agent_id", Integer),
    col("relationship_date", Timestamp),
    col("status", Text),
];

const PROPERTY_COLUMNS: &[Column] = &[
    key("property_id"),
    col("agent_id", Integer),
    col("property_type", Text),
    col("street", Text),
    col("city", Text),
    col("state", Text),
    col("zipcode", Text),
    col("list_price", Decimal),
    col("num_bedrooms", Integer),
    col("num_bathrooms", Integer),
    col("square_footage", Integer),
    col("description", Text),
    col("listing_date", Date),
    col("status", Text),
    col("image_url", Text),
];

const APPOINTMENT_COLUMNS: &[Column] = &[
    key("appointment_id"),
    col("agent_id", Integer),
    col("client_id", Integer),
    col("property_id", Integer),
    col("appointment_date", Date),
    col("appointment_time", Time),
    col("purpose", Text),
];

const TRANSACTION_COLUMNS: &[Column] = &[
    key("transaction_id"),
    col("agent_id", Integer),
    col("client_id", Integer),
    col("property_id", Integer),
    col("amount", Decimal),
    col("transaction_type", Text),
    col("created_at", Timestamp),
    col("paid_at", Timestamp),
];

/// Tables reachable through the query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `offices`
    Office,
    /// `agents`
    Agent,
    /// `clients`
    Client,
    /// `client_agents`, the client/agent relationship.
    ClientAgent,
    /// `properties`
    Property,
    /// `appointments`
    Appointment,
    /// `transactions`
    Transaction,
}

impl Table {
    /// Every table, in dependency order.
    pub const ALL: [Self; 7] = [
        Self::Office,
        Self::Agent,
        Self::Client,
        Self::ClientAgent,
        Self::Property,
        Self::Appointment,
        Self::Transaction,
    ];

    /// Table name in statement text.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Office => "offices",
            Self::Agent => "agents",
            Self::Client => "clients",
            Self::ClientAgent => "client_agents",
            Self::Property => "properties",
            Self::Appointment => "appointments",
            Self::Transaction => "transactions",
        }
    }

    /// Singular entity name used in error messages.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Office => "Office",
            Self::Agent => "Agent",
            Self::Client => "Client",
            Self::ClientAgent => "Client relationship",
            Self::Property => "Property",
            Self::Appointment => "Appointment",
            Self::Transaction => "Transaction",
        }
    }

    /// Allow-listed columns, key first.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Self::Office => OFFICE_COLUMNS,
            Self::Agent => AGENT_COLUMNS,
            Self::Client => CLIENT_COLUMNS,
            Self::ClientAgent => CLIENT_AGENT_COLUMNS,
            Self::Property => PROPERTY_COLUMNS,
            Self::Appointment => APPOINTMENT_COLUMNS,
            Self::Transaction => TRANSACTION_COLUMNS,
        }
    }

    /// Column rows are ordered by when no other order is requested.
    pub fn primary_key(&self) -> &'static str {
        match self {
            Self::ClientAgent => "client_id",
            _ => self.columns()[0].name,
        }
    }

    /// Allow-listed column by exact name.
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|c| c.name == name)
    }

    /// Look up a column, failing with `InvalidColumn` when it is not allow-listed.
    pub fn require(&self, name: &str) -> DomainResult<&'static Column> {
        self.column(name).ok_or_else(|| DomainError::InvalidColumn {
            table: self.name(),
            column: name.to_string(),
        })
    }

    /// Like [`Table::require`], but storage-generated columns are also
    /// `InvalidColumn` since callers never write them.
    pub fn require_writable(&self, name: &str) -> DomainResult<&'static Column> {
        let column = self.require(name)?;
        if column.generated {
            return Err(DomainError::InvalidColumn {
                table: self.name(),
                column: column.name.to_string(),
            });
        }
        Ok(column)
    }
}
