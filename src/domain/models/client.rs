//! Client domain model.

use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::domain::errors::DomainError;

/// A buyer, seller or renter working with one or more agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Storage-assigned id.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone; empty when unknown.
    pub phone: String,
    /// Mailing street address.
    pub street: String,
    /// Mailing city.
    pub city: String,
    /// Mailing state or province.
    pub state: String,
    /// Mailing postal code.
    pub zipcode: String,
}

impl Client {
    /// `First Last`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TryFrom<Record> for Client {
    type Error = DomainError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.integer("client_id")?,
            first_name: record.text("first_name")?,
            last_name: record.text("last_name")?,
            email: record.text("email")?,
            phone: record.opt_text("phone")?.unwrap_or_default(),
            street: record.opt_text("street")?.unwrap_or_default(),
            city: record.opt_text("city")?.unwrap_or_default(),
            state: record.opt_text("state")?.unwrap_or_default(),
            zipcode: record.opt_text("zipcode")?.unwrap_or_default(),
        })
    }
}
