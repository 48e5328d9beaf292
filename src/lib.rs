//! Brokerage - typed data access for a real-estate agent backend
//!
//! Agents, offices, clients, property listings, appointments and
//! transactions stored in SQLite. Statement text is built only from
//! allow-listed schema identifiers; every caller value is a bound argument.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, typed records, errors and repository ports
//! - **Adapters** (`adapters`): SQLite query builder, record mapper and repositories
//! - **Service Layer** (`services`): retry policy around repository calls
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use brokerage::adapters::sqlite::{initialize_database, SqliteAgentRepository};
//! use brokerage::{AgentService, Config, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let pool = initialize_database(&config.database).await?;
//!     let agents = AgentService::new(
//!         Arc::new(SqliteAgentRepository::new(pool)),
//!         RetryPolicy::from(&config.retry),
//!     );
//!     let agent = agents.get_agent(1).await?;
//!     println!("{}", agent.full_name());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, FieldError};
pub use domain::models::{
    Agent, Appointment, Client, Config, DatabaseConfig, LoggingConfig, NewAppointment,
    NewProperty, NewTransaction, Office, Property, PropertyStatus, PropertyType, Record,
    RetryConfig, Transaction, TransactionType, Value,
};
pub use domain::ports::{AgentRepository, ClientRepository, PropertyFilter};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AgentService, ClientService, RetryPolicy};
