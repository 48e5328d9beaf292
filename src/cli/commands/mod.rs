//! Subcommand implementations.

pub mod agent;
pub mod client;
pub mod init;
