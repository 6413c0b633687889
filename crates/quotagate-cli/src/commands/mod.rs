//! CLI command definitions and dispatch.

pub mod config;
pub mod kick;
pub mod quotas;
pub mod serve;
pub mod sessions;

use clap::{Parser, Subcommand};

use quotagate_core::config::AppConfig;
use quotagate_core::error::AppError;
use quotagate_service::QuotaService;

use crate::output::OutputFormat;

/// QuotaGate: webhook quota gatekeeper for a live media relay
#[derive(Debug, Parser)]
#[command(name = "quotagate", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file (extension optional)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}`
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
    /// Start the QuotaGate server
    Serve(serve::ServeArgs),
    /// Show the quota ledger for a month
    Quotas(quotas::QuotasArgs),
    /// List active sessions per stream
    Sessions,
    /// Kick a session off the relay and forget it
    Kick(kick::KickArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, self).await,
            Commands::Quotas(args) => quotas::execute(args, self).await,
            Commands::Sessions => sessions::execute(self).await,
            Commands::Kick(args) => kick::execute(args, self).await,
            Commands::Config(args) => config::execute(args, self).await,
        }
    }

    /// Load configuration from the selected file and environment.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }

    /// Connect to the store and relay configured for this environment.
    pub async fn connect(&self) -> Result<QuotaService, AppError> {
        let config = self.load_config()?;
        let state = quotagate_api::app::build_state(config).await?;
        Ok(state.quota_service.as_ref().clone())
    }
}
