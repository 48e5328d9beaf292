//! Domain models for the brokerage data-access layer.

pub mod agent;
pub mod appointment;
pub mod client;
pub mod config;
pub mod property;
pub mod record;
pub mod transaction;

pub use agent::{Agent, Office};
pub use appointment::{Appointment, NewAppointment};
pub use client::Client;
pub use config::{Config, DatabaseConfig, LoggingConfig, RetryConfig};
pub use property::{NewProperty, Property, PropertyStatus, PropertyType};
pub use record::{Record, Value, ValueKind};
pub use transaction::{NewTransaction, Transaction, TransactionType};
