//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use quotagate_cache::redis::client::mask_redis_url;
use quotagate_core::error::AppError;

use super::Cli;
use crate::output;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, cli: &Cli) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = cli.load_config()?;
            config.store.redis.url = mask_redis_url(&config.store.redis.url);
            output::print_item(&config, cli.format);
        }
        ConfigCommand::Validate => match cli.load_config() {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", cli.config));
                output::print_kv("Server", &config.server.bind_addr());
                output::print_kv("Store", &config.store.provider);
                output::print_kv("Redis", &mask_redis_url(&config.store.redis.url));
                output::print_kv("Relay", &config.relay.kick_session_url());
                output::print_kv(
                    "Default quota",
                    &format!("{}s", config.quota.default_seconds),
                );
                output::print_kv(
                    "Enforcer",
                    &format!(
                        "every {}s, {}s per tick",
                        config.enforcer.interval_seconds, config.enforcer.cost_per_tick
                    ),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
