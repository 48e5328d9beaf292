//! Agent and office domain models.
//!
//! Agents and offices are read-only from this layer's perspective; they are
//! provisioned elsewhere and only looked up here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::domain::errors::DomainError;

/// A licensed real-estate agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Storage-assigned id.
    pub id: i64,
    /// Office the agent works out of, if assigned.
    pub office_id: Option<i64>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email, unique per agent.
    pub email: String,
    /// Contact phone; empty when unknown.
    pub phone: String,
    /// State license number.
    pub license_number: Option<String>,
    /// Start date with the brokerage.
    pub date_hired: Option<NaiveDate>,
}

impl Agent {
    /// `First Last`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TryFrom<Record> for Agent {
    type Error = DomainError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.integer("agent_id")?,
            office_id: record.opt_integer("office_id")?,
            first_name: record.text("first_name")?,
            last_name: record.text("last_name")?,
            email: record.text("email")?,
            phone: record.opt_text("phone")?.unwrap_or_default(),
            license_number: record.opt_text("license_number")?,
            date_hired: record.opt_date("date_hired")?,
        })
    }
}

/// A brokerage office that agents work out of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    /// Storage-assigned id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zipcode: String,
    /// Front-desk phone.
    pub phone: String,
}

impl TryFrom<Record> for Office {
    type Error = DomainError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.integer("office_id")?,
            name: record.text("office_name")?,
            street: record.text("street")?,
            city: record.text("city")?,
            state: record.text("state")?,
            zipcode: record.text("zipcode")?,
            phone: record.opt_text("phone")?.unwrap_or_default(),
        })
    }
}
