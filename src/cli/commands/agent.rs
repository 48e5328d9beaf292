//! Agent CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::adapters::sqlite::SqliteAgentRepository;
use crate::cli::connect;
use crate::cli::display::{
    AgentView, AppointmentListView, ClientListView, OfficeView, PropertyListView,
    TransactionListView,
};
use crate::cli::output::{output, ActionOutput};
use crate::domain::models::{Config, NewTransaction, Record};
use crate::services::{AgentService, RetryPolicy};

/// Arguments for `brokerage agent`.
#[derive(Args, Debug)]
pub struct AgentArgs {
    /// Agent operation to run.
    #[command(subcommand)]
    pub command: AgentCommands,
}

/// Agent-side operations.
#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Show an agent's details
    Show {
        /// Agent to show
        agent_id: i64,
    },
    /// Show the office an agent works out of
    Office {
        /// Agent whose office to show
        agent_id: i64,
    },
    /// List an agent's property listings
    Properties {
        /// Listing agent
        agent_id: i64,
    },
    /// List an agent's appointments
    Appointments {
        /// Agent whose calendar to list
        agent_id: i64,
    },
    /// List clients linked to an agent
    Clients {
        /// Agent whose clients to list
        agent_id: i64,
    },
    /// List an agent's transactions
    Transactions {
        /// Agent party to the transactions
        agent_id: i64,
    },
    /// List a new property
    AddProperty(AddPropertyArgs),
    /// Record a transaction
    AddTransaction {
        /// Agent recording the transaction
        agent_id: i64,
        /// Client party to the transaction
        #[arg(long)]
        client: i64,
        /// Amount (non-negative decimal)
        #[arg(long)]
        amount: Decimal,
        /// SALE, PURCHASE or RENTAL
        #[arg(long = "type")]
        transaction_type: String,
        /// Property involved, if any
        #[arg(long)]
        property: Option<i64>,
    },
}

/// Listing fields arrive as text and are validated together, so a
/// missing or malformed field is reported alongside every other one.
#[derive(Args, Debug, Default)]
pub struct AddPropertyArgs {
    /// Agent listing the property
    pub agent_id: i64,
    /// HOUSE, CONDO, TOWNHOUSE, APARTMENT, LAND or COMMERCIAL
    #[arg(long = "type")]
    pub property_type: Option<String>,
    /// Street address
    #[arg(long)]
    pub street: Option<String>,
    /// City
    #[arg(long)]
    pub city: Option<String>,
    /// State or province
    #[arg(long)]
    pub state: Option<String>,
    /// Postal code
    #[arg(long)]
    pub zipcode: Option<String>,
    /// List price
    #[arg(long)]
    pub price: Option<String>,
    /// Number of bedrooms
    #[arg(long)]
    pub bedrooms: Option<String>,
    /// Number of bathrooms
    #[arg(long)]
    pub bathrooms: Option<String>,
    /// Square footage
    #[arg(long)]
    pub sqft: Option<String>,
    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,
    /// YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub listing_date: Option<String>,
    /// AVAILABLE, PENDING or SOLD; defaults to AVAILABLE
    #[arg(long)]
    pub status: Option<String>,
    /// Link to a listing photo
    #[arg(long)]
    pub image_url: Option<String>,
}

impl AddPropertyArgs {
    /// Column values for the fields that were given.
    pub fn to_record(&self) -> Record {
        let optional = [
            ("property_type", &self.property_type),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zipcode", &self.zipcode),
            ("list_price", &self.price),
            ("num_bedrooms", &self.bedrooms),
            ("num_bathrooms", &self.bathrooms),
            ("square_footage", &self.sqft),
            ("description", &self.description),
            ("listing_date", &self.listing_date),
            ("status", &self.status),
            ("image_url", &self.image_url),
        ];

        optional
            .into_iter()
            .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
            .collect::<Record>()
            .with("agent_id", self.agent_id)
    }
}

/// Run an agent subcommand against the configured database.
pub async fn execute(args: AgentArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = connect(config).await?;
    let repo = Arc::new(SqliteAgentRepository::new(pool));
    let service = AgentService::new(repo, RetryPolicy::from(&config.retry));

    match args.command {
        AgentCommands::Show { agent_id } => {
            output(&AgentView(service.get_agent(agent_id).await?), json_mode);
        }

        AgentCommands::Office { agent_id } => {
            let office = service.get_office(agent_id).await?;
            output(&OfficeView { agent_id, office }, json_mode);
        }

        AgentCommands::Properties { agent_id } => {
            let properties = service.get_properties(agent_id).await?;
            output(&PropertyListView::from(properties), json_mode);
        }

        AgentCommands::Appointments { agent_id } => {
            let appointments = service.get_appointments(agent_id).await?;
            output(&AppointmentListView::from(appointments), json_mode);
        }

        AgentCommands::Clients { agent_id } => {
            let clients = service.get_clients(agent_id).await?;
            output(&ClientListView::from(clients), json_mode);
        }

        AgentCommands::Transactions { agent_id } => {
            let transactions = service.get_transactions(agent_id).await?;
            output(&TransactionListView::from(transactions), json_mode);
        }

        AgentCommands::AddProperty(property) => {
            let id = service.add_property(property.to_record()).await?;
            let out = ActionOutput {
                success: true,
                message: format!("Property listed: {id}"),
                id: Some(id),
            };
            output(&out, json_mode);
        }

        AgentCommands::AddTransaction {
            agent_id,
            client,
            amount,
            transaction_type,
            property,
        } => {
            let mut transaction = NewTransaction::new(agent_id, client, amount, transaction_type);
            transaction.property_id = property;
            let created = service.add_transaction(transaction).await?;
            let out = ActionOutput {
                success: true,
                message: format!(
                    "Transaction recorded: {} ({} {})",
                    created.id,
                    created.transaction_type.as_str(),
                    created.amount
                ),
                id: Some(created.id),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Value;

    #[test]
    fn test_add_property_args_only_carry_given_fields() {
        let args = AddPropertyArgs {
            agent_id: 3,
            property_type: Some("condo".into()),
            price: Some("199000".into()),
            ..Default::default()
        };
        let record = args.to_record();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("agent_id"), Some(&Value::Integer(3)));
        assert_eq!(record.get("list_price"), Some(&Value::Text("199000".into())));
        assert!(record.get("street").is_none());
    }
}
