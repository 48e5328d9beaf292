//! Client CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use std::sync::Arc;

use crate::adapters::sqlite::SqliteClientRepository;
use crate::cli::connect;
use crate::cli::display::{AgentListView, AppointmentListView, ClientView, PropertyListView, TransactionListView};
use crate::cli::output::{output, ActionOutput};
use crate::domain::models::{Config, NewAppointment, PropertyStatus};
use crate::domain::ports::PropertyFilter;
use crate::services::{ClientService, RetryPolicy};

/// Arguments for `brokerage client`.
#[derive(Args, Debug)]
pub struct ClientArgs {
    /// Client operation to run.
    #[command(subcommand)]
    pub command: ClientCommands,
}

/// Client-side operations.
#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Show a client's details
    Show {
        /// Client to show
        client_id: i64,
    },
    /// Show a single property listing
    Property {
        /// Listing to show
        property_id: i64,
    },
    /// Browse property listings
    Browse {
        /// Only listings by this agent
        #[arg(long)]
        agent: Option<i64>,
        /// AVAILABLE, PENDING or SOLD
        #[arg(long)]
        status: Option<String>,
        /// Only listings in this city
        #[arg(long)]
        city: Option<String>,
    },
    /// List agents the client works with
    Agents {
        /// Client whose agents to list
        client_id: i64,
    },
    /// List the client's appointments
    Appointments {
        /// Client whose appointments to list
        client_id: i64,
    },
    /// List the client's transactions
    Transactions {
        /// Client party to the transactions
        client_id: i64,
    },
    /// Book an appointment with an agent
    Book {
        /// Client making the booking
        client_id: i64,
        /// Agent to meet
        #[arg(long)]
        agent: i64,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        time: String,
        /// Property to view, if any
        #[arg(long)]
        property: Option<i64>,
        /// Reason for the visit
        #[arg(long, default_value = "")]
        purpose: String,
    },
    /// Mark a transaction as paid
    Pay {
        /// Transaction to mark paid
        transaction_id: i64,
    },
}

/// Run a client subcommand against the configured database.
pub async fn execute(args: ClientArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = connect(config).await?;
    let repo = Arc::new(SqliteClientRepository::new(pool));
    let service = ClientService::new(repo, RetryPolicy::from(&config.retry));

    match args.command {
        ClientCommands::Show { client_id } => {
            output(&ClientView(service.get_client(client_id).await?), json_mode);
        }

        ClientCommands::Property { property_id } => {
            let property = service.get_property(property_id).await?;
            output(&PropertyListView::from(vec![property]), json_mode);
        }

        ClientCommands::Browse { agent, status, city } => {
            let status = status
                .map(|s| {
                    PropertyStatus::parse_str(&s).ok_or_else(|| anyhow!("Invalid status: {s}"))
                })
                .transpose()?;
            let filter = PropertyFilter {
                agent_id: agent,
                status,
                city,
            };
            let properties = service.browse_properties(filter).await?;
            output(&PropertyListView::from(properties), json_mode);
        }

        ClientCommands::Agents { client_id } => {
            output(&AgentListView::from(service.get_agents(client_id).await?), json_mode);
        }

        ClientCommands::Appointments { client_id } => {
            let appointments = service.get_appointments(client_id).await?;
            output(&AppointmentListView::from(appointments), json_mode);
        }

        ClientCommands::Transactions { client_id } => {
            let transactions = service.get_transactions(client_id).await?;
            output(&TransactionListView::from(transactions), json_mode);
        }

        ClientCommands::Book {
            client_id,
            agent,
            date,
            time,
            property,
            purpose,
        } => {
            let booked = service
                .book_appointment(NewAppointment {
                    agent_id: agent,
                    client_id,
                    property_id: property,
                    appointment_date: date,
                    appointment_time: time,
                    purpose,
                })
                .await?;
            let out = ActionOutput {
                success: true,
                message: format!(
                    "Appointment {} booked for {} at {}",
                    booked.id,
                    booked.appointment_date,
                    booked.appointment_time.format("%H:%M")
                ),
                id: Some(booked.id),
            };
            output(&out, json_mode);
        }

        ClientCommands::Pay { transaction_id } => {
            let paid = service.pay_transaction(transaction_id).await?;
            let out = ActionOutput {
                success: true,
                message: format!("Transaction {} paid ({})", paid.id, paid.amount),
                id: Some(paid.id),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
