//! Brokerage CLI entry point.

use clap::Parser;

use brokerage::cli::{handle_error, load_config, Cli, Commands};
use brokerage::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => brokerage::cli::commands::init::execute(args, &config, cli.json).await,
        Commands::Agent(args) => brokerage::cli::commands::agent::execute(args, &config, cli.json).await,
        Commands::Client(args) => brokerage::cli::commands::client::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
