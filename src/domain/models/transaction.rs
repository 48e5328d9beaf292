//! Transaction domain model.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::domain::errors::{DomainError, FieldError};

/// What kind of deal a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// The client sold through the agent.
    Sale,
    /// The client bought through the agent.
    Purchase,
    /// A lease or rental payment.
    Rental,
}

impl TransactionType {
    /// Every type, in display order.
    pub const ALL: [Self; 3] = [Self::Sale, Self::Purchase, Self::Rental];

    /// Canonical upper-case storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "SALE",
            Self::Purchase => "PURCHASE",
            Self::Rental => "RENTAL",
        }
    }

    /// Case-insensitive parse of the storage form.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SALE" => Some(Self::Sale),
            "PURCHASE" => Some(Self::Purchase),
            "RENTAL" => Some(Self::Rental),
            _ => None,
        }
    }
}

/// A recorded money movement between a client and an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Storage-assigned id.
    pub id: i64,
    /// Agent party.
    pub agent_id: i64,
    /// Client party.
    pub client_id: i64,
    /// Property involved, if any.
    pub property_id: Option<i64>,
    /// Non-negative amount, exact to the cent.
    pub amount: Decimal,
    /// Kind of deal.
    pub transaction_type: TransactionType,
    /// When the transaction was recorded.
    pub created_at: DateTime<Utc>,
    /// When it was paid; `None` while outstanding.
    pub paid_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// True once `paid_at` is set.
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }
}

impl TryFrom<Record> for Transaction {
    type Error = DomainError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        let raw_type = record.text("transaction_type")?;
        let transaction_type =
            TransactionType::parse_str(&raw_type).ok_or_else(|| DomainError::TypeMismatch {
                column: "transaction_type".to_string(),
                expected: "transaction type",
                found: raw_type.clone(),
            })?;

        Ok(Self {
            id: record.integer("transaction_id")?,
            agent_id: record.integer("agent_id")?,
            client_id: record.integer("client_id")?,
            property_id: record.opt_integer("property_id")?,
            amount: record.decimal("amount")?,
            transaction_type,
            created_at: record.timestamp("created_at")?,
            paid_at: record.opt_timestamp("paid_at")?,
        })
    }
}

/// Request to record a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Agent recording the transaction.
    pub agent_id: i64,
    /// Client party.
    pub client_id: i64,
    /// Property involved, if any.
    pub property_id: Option<i64>,
    /// Must not be negative.
    pub amount: Decimal,
    /// `SALE`, `PURCHASE` or `RENTAL`, any case.
    pub transaction_type: String,
}

impl NewTransaction {
    /// A transaction with no property attached.
    pub fn new(
        agent_id: i64,
        client_id: i64,
        amount: Decimal,
        transaction_type: impl Into<String>,
    ) -> Self {
        Self {
            agent_id,
            client_id,
            property_id: None,
            amount,
            transaction_type: transaction_type.into(),
        }
    }

    /// Attach the property involved.
    #[must_use]
    pub fn with_property(mut self, property_id: i64) -> Self {
        self.property_id = Some(property_id);
        self
    }

    /// Column values for insertion stamped with `created_at`, or every
    /// invalid field.
    pub fn to_record(&self, created_at: DateTime<Utc>) -> Result<Record, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            errors.push(FieldError::new("amount", "must be >= 0"));
        }

        let transaction_type = TransactionType::parse_str(&self.transaction_type);
        if transaction_type.is_none() {
            let allowed: Vec<&str> = TransactionType::ALL.iter().map(TransactionType::as_str).collect();
            errors.push(FieldError::new(
                "transaction_type",
                format!("must be one of: {}", allowed.join(", ")),
            ));
        }

        match transaction_type {
            Some(transaction_type) if errors.is_empty() => Ok(Record::new()
                .with("agent_id", self.agent_id)
                .with("client_id", self.client_id)
                .with("property_id", self.property_id)
                .with("amount", self.amount)
                .with("transaction_type", transaction_type.as_str())
                .with("created_at", created_at.trunc_subsecs(6))),
            _ => Err(errors),
        }
    }
}
