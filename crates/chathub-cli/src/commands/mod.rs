//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod policy;

use clap::{Parser, Subcommand};

use chathub_core::config::AppConfig;
use chathub_core::error::AppError;
use chathub_database::DatabasePool;

use crate::output::OutputFormat;

/// ChatHub administration
#[derive(Debug, Parser)]
#[command(name = "chathub", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and per-environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to apply (`config/<env>.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Operator account management
    Admin(admin::AdminArgs),
    /// Access policy inspection
    Policy(policy::PolicyArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Admin(args) => admin::execute(args, &config).await,
            Commands::Policy(args) => policy::execute(args, &config, self.format),
        }
    }
}

/// Helper: connect to the configured database
pub async fn connect_database(config: &AppConfig) -> Result<DatabasePool, AppError> {
    if config.database.provider != "postgres" {
        return Err(AppError::bad_request(format!(
            "Database provider '{}' has nothing to administer; use 'postgres'",
            config.database.provider
        )));
    }
    DatabasePool::connect(&config.database).await
}
