//! Start the QuotaGate server.

use clap::Args;

use quotagate_core::error::AppError;

use super::Cli;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Do not run the enforcement sweep in this process
    #[arg(long)]
    pub no_enforcer: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, cli: &Cli) -> Result<(), AppError> {
    let mut config = cli.load_config()?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.no_enforcer {
        config.enforcer.enabled = false;
    }

    println!("Starting QuotaGate server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Store: {}", config.store.provider);
    println!("  Enforcer: {}", if config.enforcer.enabled { "on" } else { "off" });

    quotagate_api::run_server(config, quotagate_api::shutdown_signal()).await
}
