//! Implementation of the `brokerage init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, DatabaseConfig};
use crate::infrastructure::config::{ConfigLoader, CONFIG_DIR};

const DATABASE_FILE: &str = "brokerage.db";

/// Arguments for `brokerage init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Result of `brokerage init`.
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// Always true; failures surface as errors.
    pub success: bool,
    /// Summary line.
    pub message: String,
    /// Where the config file lives.
    pub config_path: PathBuf,
    /// Where the database file lives.
    pub database_path: PathBuf,
    /// False when an existing config was kept.
    pub config_written: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("Config written to {}", self.config_path.display()));
        }
        lines.push(format!("Database ready at {}", self.database_path.display()));
        lines.join("\n")
    }
}

/// Write the project config (unless present) and create the migrated database.
pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let project_dir = target_path.join(CONFIG_DIR);
    fs::create_dir_all(&project_dir)
        .await
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    let config_path = ConfigLoader::config_path(&project_dir);
    let config_written = args.force || !config_path.exists();
    if config_written {
        let yaml = serde_yaml::to_string(&Config::default()).context("Failed to serialize default config")?;
        fs::write(&config_path, yaml)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let database_path = project_dir.join(DATABASE_FILE);
    let database = DatabaseConfig {
        path: database_path.display().to_string(),
        ..config.database.clone()
    };
    let pool = initialize_database(&database)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let out = InitOutput {
        success: true,
        message: if config_written {
            "Project initialized.".to_string()
        } else {
            "Project already initialized; schema is up to date. Use --force to rewrite the config."
                .to_string()
        },
        config_path,
        database_path,
        config_written,
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_config_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            force: false,
            path: dir.path().to_path_buf(),
        };
        execute(args, &Config::default(), true).await.unwrap();

        let project_dir = dir.path().join(CONFIG_DIR);
        assert!(project_dir.join(DATABASE_FILE).exists());
        let written = temp_env::with_vars_unset(
            ["BROKERAGE_DATABASE__PATH", "BROKERAGE_LOGGING__LEVEL"],
            || ConfigLoader::load_from_file(ConfigLoader::config_path(&project_dir)).unwrap(),
        );
        assert_eq!(written, Config::default());
    }
}
