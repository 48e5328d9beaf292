//! Command-line interface.

pub mod commands;
pub mod display;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use crate::adapters::sqlite::initialize_database;
use crate::domain::errors::DomainError;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Command-line entry point.
#[derive(Parser, Debug)]
#[command(name = "brokerage", version, about = "Real-estate brokerage data access")]
pub struct Cli {
    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to load instead of .brokerage/config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the project config and database
    Init(commands::init::InitArgs),
    /// Agent-side operations
    Agent(commands::agent::AgentArgs),
    /// Client-side operations
    Client(commands::client::ClientArgs),
}

/// Load configuration from `path`, or from the default layered sources.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Open the configured database, applying pending migrations.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    initialize_database(&config.database)
        .await
        .with_context(|| {
            format!(
                "Failed to open database at {}. Run 'brokerage init' first.",
                config.database.path
            )
        })
}

/// Print an error and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let domain = err.downcast_ref::<DomainError>();

    if json_mode {
        let fields: Vec<_> = domain
            .map(DomainError::field_errors)
            .unwrap_or_default()
            .iter()
            .map(|e| serde_json::json!({ "field": e.field, "message": e.message }))
            .collect();
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
            "fields": fields,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        match domain {
            Some(DomainError::ValidationError(errors)) => {
                eprintln!("Error: validation failed");
                for e in errors {
                    eprintln!("  - {e}");
                }
            }
            _ => eprintln!("Error: {err:#}"),
        }
    }

    let code = match domain {
        Some(DomainError::ValidationError(_)) => 2,
        Some(DomainError::NotFound { .. }) => 3,
        _ => 1,
    };
    std::process::exit(code);
}
